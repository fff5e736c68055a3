use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::models::{Report, ReportFilter, SortDirection, SortKey, SortSpec, Status};

/// Derive the display sequence for a report listing: filter, then optionally
/// stable-sort. Pure; the input slice is never mutated, and reapplying the
/// same filter and sort to the output returns it unchanged.
///
/// With no sort the store's insertion order is preserved, so an all-pass
/// filter is the identity.
pub fn project(reports: &[Report], filter: &ReportFilter, sort: Option<SortSpec>) -> Vec<Report> {
    let mut out: Vec<Report> = reports
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();

    if let Some(spec) = sort {
        out.sort_by(|a, b| {
            let ord = compare_by(a, b, spec.key);
            match spec.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    out
}

fn compare_by(a: &Report, b: &Report, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::Reporter => a.reporter.cmp(&b.reporter),
        SortKey::Department => a.department.as_str().cmp(b.department.as_str()),
        SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        SortKey::Location => a.location.cmp(&b.location),
        SortKey::Date => a.reported_at.cmp(&b.reported_at),
    }
}

/// Reports partitioned into one bucket per defined status, in the order the
/// grouped board renders its columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusBoard {
    pub reported: Vec<Report>,
    pub in_progress: Vec<Report>,
    pub resolved: Vec<Report>,
    pub sos: Vec<Report>,
}

impl StatusBoard {
    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
            && self.in_progress.is_empty()
            && self.resolved.is_empty()
            && self.sos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reported.len() + self.in_progress.len() + self.resolved.len() + self.sos.len()
    }
}

/// Partition reports into fixed per-status buckets, preserving each bucket's
/// relative order from the input. Every defined status yields a bucket even
/// when empty. Records with a status outside the defined set are dropped
/// from all buckets rather than failing the grouping.
pub fn group_by_status(reports: &[Report]) -> StatusBoard {
    let mut board = StatusBoard::default();
    for report in reports {
        match report.status {
            Status::Reported => board.reported.push(report.clone()),
            Status::InProgress => board.in_progress.push(report.clone()),
            Status::Resolved => board.resolved.push(report.clone()),
            Status::Sos => board.sos.push(report.clone()),
            Status::Custom(_) => {
                debug!(id = %report.id, status = %report.status, "dropping report with undefined status from board");
            }
        }
    }
    board
}
