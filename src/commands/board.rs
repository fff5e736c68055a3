use anyhow::{bail, Result};

use crate::commands::truncate;
use crate::models::{Report, ReportFilter, SortKey, SortSpec, VALID_SORT_KEYS};
use crate::store::ReportStore;
use crate::view;

/// Render the grouped status board. The SOS column only appears when the
/// alert feed is armed or the bucket already has records.
pub fn run(store: &ReportStore, sort_by: Option<&str>, show_sos: bool, json: bool) -> Result<()> {
    let sort = match sort_by {
        Some(raw) => match SortKey::parse(raw) {
            Some(key) => column_sort(key),
            None => bail!(
                "Invalid sort key '{}'. Must be one of: {}",
                raw,
                VALID_SORT_KEYS.join(", ")
            ),
        },
        None => column_sort(SortKey::Date),
    };

    let board = view::group_by_status(store.reports());

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    print_column("Reported", &board.reported, sort);
    print_column("In-Progress", &board.in_progress, sort);
    print_column("Resolved", &board.resolved, sort);
    if show_sos || !board.sos.is_empty() {
        print_column("SOS", &board.sos, sort);
    }

    Ok(())
}

/// Each board column defaults to newest-first; every other key reads
/// naturally ascending.
fn column_sort(key: SortKey) -> SortSpec {
    match key {
        SortKey::Date => SortSpec::descending(SortKey::Date),
        key => SortSpec::ascending(key),
    }
}

fn print_column(title: &str, bucket: &[Report], sort: SortSpec) {
    let rows = view::project(bucket, &ReportFilter::default(), Some(sort));

    println!("{} ({})", title, rows.len());
    if rows.is_empty() {
        println!("  (none)");
    }
    for report in &rows {
        println!(
            "  {:<6} {:<32} {:<13} {}",
            report.id,
            truncate(&report.title, 32),
            truncate(&report.location, 13),
            report.reported_at.format("%Y-%m-%d")
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, Status};

    #[test]
    fn test_run_default_sort() {
        let store = ReportStore::with_demo_data();
        assert!(run(&store, None, false, false).is_ok());
    }

    #[test]
    fn test_run_each_sort_key() {
        let store = ReportStore::with_demo_data();
        for key in VALID_SORT_KEYS {
            assert!(run(&store, Some(key), false, false).is_ok());
        }
    }

    #[test]
    fn test_run_json() {
        let store = ReportStore::with_demo_data();
        assert!(run(&store, None, false, true).is_ok());
    }

    #[test]
    fn test_invalid_sort_key_fails() {
        let store = ReportStore::with_demo_data();
        let err = run(&store, Some("severity"), false, false).unwrap_err();
        assert!(err.to_string().contains("Invalid sort key 'severity'"));
    }

    #[test]
    fn test_empty_store_renders_empty_columns() {
        let store = ReportStore::new();
        assert!(run(&store, None, true, false).is_ok());
    }

    #[test]
    fn test_column_sort_directions() {
        assert_eq!(
            column_sort(SortKey::Date).direction,
            SortDirection::Descending
        );
        assert_eq!(
            column_sort(SortKey::Title).direction,
            SortDirection::Ascending
        );
        assert_eq!(
            column_sort(SortKey::Location).direction,
            SortDirection::Ascending
        );
    }

    #[test]
    fn test_sos_records_render() {
        let mut store = ReportStore::with_demo_data();
        for record in crate::feed::alert_batch() {
            store.append(record);
        }
        let board = view::group_by_status(store.reports());
        assert_eq!(board.sos.len(), 2);
        assert!(run(&store, None, false, false).is_ok());
    }

    #[test]
    fn test_grouping_matches_demo_statuses() {
        let store = ReportStore::with_demo_data();
        let board = view::group_by_status(store.reports());
        assert_eq!(board.reported.len(), 2);
        assert!(board
            .reported
            .iter()
            .all(|r| r.status == Status::Reported));
    }
}
