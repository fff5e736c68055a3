use serde::Serialize;

use crate::models::{Employee, Report, Status};

/// Aggregate counts for the dashboard. `submitted` is the total number of
/// reports regardless of status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub submitted: usize,
    pub reported: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub sos: usize,
}

pub fn summarize(reports: &[Report]) -> StatusCounts {
    let mut counts = StatusCounts {
        submitted: reports.len(),
        ..StatusCounts::default()
    };
    for report in reports {
        match report.status {
            Status::Reported => counts.reported += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Resolved => counts.resolved += 1,
            Status::Sos => counts.sos += 1,
            // Counted in submitted only.
            Status::Custom(_) => {}
        }
    }
    counts
}

/// Employees ranked by points, highest first. Ties keep directory order.
pub fn top_performers(employees: &[Employee], limit: usize) -> Vec<Employee> {
    let mut ranked = employees.to_vec();
    ranked.sort_by(|a, b| b.points.cmp(&a.points));
    ranked.truncate(limit);
    ranked
}
