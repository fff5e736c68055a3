use anyhow::{bail, Result};

use crate::commands::truncate;
use crate::models::{
    Department, ReportFilter, SortDirection, SortKey, SortSpec, Status, VALID_DEPARTMENTS,
    VALID_SORT_KEYS, VALID_STATUSES,
};
use crate::store::ReportStore;
use crate::view;

pub fn run(
    store: &ReportStore,
    department: Option<&str>,
    status: Option<&str>,
    sort: Option<&str>,
    descending: bool,
    json: bool,
) -> Result<()> {
    let filter = parse_filter(department, status)?;
    let sort = parse_sort(sort, descending)?;

    let reports = view::project(store.reports(), &filter, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No reports found.");
        return Ok(());
    }

    for report in &reports {
        let status_display = format!("[{}]", report.status);
        let date = report.reported_at.format("%Y-%m-%d");
        println!(
            "{:<6} {:<13} {:<32} {:<18} {:<20} {:<13} {}",
            report.id,
            status_display,
            truncate(&report.title, 32),
            truncate(&report.reporter, 18),
            report.department,
            truncate(&report.location, 13),
            date
        );
    }

    Ok(())
}

/// Build the filter from raw console arguments. "all" (any case) means no
/// filter, matching the page dropdowns.
fn parse_filter(department: Option<&str>, status: Option<&str>) -> Result<ReportFilter> {
    let department = match department {
        Some(raw) if raw.eq_ignore_ascii_case("all") => None,
        Some(raw) => match Department::parse(raw) {
            Some(dept) => Some(dept),
            None => bail!(
                "Invalid department '{}'. Must be one of: {}",
                raw,
                VALID_DEPARTMENTS.join(", ")
            ),
        },
        None => None,
    };

    let status = match status {
        Some(raw) if raw.eq_ignore_ascii_case("all") => None,
        Some(raw) => match Status::parse(raw) {
            Some(status) => Some(status),
            None => bail!(
                "Invalid status '{}'. Must be one of: {}",
                raw,
                VALID_STATUSES.join(", ")
            ),
        },
        None => None,
    };

    Ok(ReportFilter { department, status })
}

fn parse_sort(key: Option<&str>, descending: bool) -> Result<Option<SortSpec>> {
    let Some(raw) = key else {
        if descending {
            bail!("--desc requires --sort");
        }
        return Ok(None);
    };

    let Some(key) = SortKey::parse(raw) else {
        bail!(
            "Invalid sort key '{}'. Must be one of: {}",
            raw,
            VALID_SORT_KEYS.join(", ")
        );
    };

    let direction = if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    Ok(Some(SortSpec { key, direction }))
}
