#![no_main]

//! Fuzz target for the report projection pipeline.
//!
//! Drives arbitrary report data through seeding, appending, filtering,
//! sorting, grouping, and status advancement. The goal is to catch panics
//! from odd Unicode in sortable fields and to hold the projection laws
//! (idempotence, filter containment, append idempotence) under arbitrary
//! input.

use arbitrary::Arbitrary;
use chrono::{DateTime, TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

use saarthi::models::{Department, Report, ReportFilter, SortKey, SortSpec, Status};
use saarthi::store::ReportStore;
use saarthi::view;

#[derive(Arbitrary, Debug)]
struct FuzzReport {
    /// Report id - duplicates are expected and must collapse
    id: String,
    /// Title - can contain any Unicode
    title: String,
    reporter: String,
    department: u8,
    status: u8,
    location: String,
    /// Epoch seconds for the report timestamp
    timestamp: u32,
}

#[derive(Arbitrary, Debug)]
struct ProjectionInput {
    reports: Vec<FuzzReport>,
    filter_department: Option<u8>,
    filter_status: Option<u8>,
    sort_key: u8,
    descending: bool,
    /// Id to advance - present or not, it must never panic
    advance_id: String,
}

fn pick_department(choice: u8) -> Department {
    match choice % 6 {
        0 => Department::PublicWorks,
        1 => Department::Electrical,
        2 => Department::Sanitation,
        3 => Department::WaterSupply,
        4 => Department::Traffic,
        _ => Department::ParksRecreation,
    }
}

fn pick_status(choice: u8) -> Status {
    match choice % 5 {
        0 => Status::Reported,
        1 => Status::InProgress,
        2 => Status::Resolved,
        3 => Status::Sos,
        _ => Status::Custom("unknown".to_string()),
    }
}

fn pick_sort_key(choice: u8) -> SortKey {
    match choice % 7 {
        0 => SortKey::Id,
        1 => SortKey::Title,
        2 => SortKey::Reporter,
        3 => SortKey::Department,
        4 => SortKey::Status,
        5 => SortKey::Location,
        _ => SortKey::Date,
    }
}

fn build_report(fuzz: &FuzzReport) -> Report {
    Report {
        id: fuzz.id.clone(),
        title: fuzz.title.clone(),
        description: String::new(),
        reporter: fuzz.reporter.clone(),
        department: pick_department(fuzz.department),
        status: pick_status(fuzz.status),
        location: fuzz.location.clone(),
        reported_at: Utc
            .timestamp_opt(i64::from(fuzz.timestamp), 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
    }
}

fuzz_target!(|input: ProjectionInput| {
    // Limit to a reasonable number of records
    if input.reports.len() > 64 {
        return;
    }

    let mut store = ReportStore::seed(input.reports.iter().map(build_report).collect());

    // Re-appending every record must not grow the store
    let len = store.len();
    for fuzz in &input.reports {
        store.append(build_report(fuzz));
    }
    assert_eq!(store.len(), len);

    let filter = ReportFilter {
        department: input.filter_department.map(pick_department),
        status: input.filter_status.map(pick_status),
    };
    let key = pick_sort_key(input.sort_key);
    let sort = if input.descending {
        SortSpec::descending(key)
    } else {
        SortSpec::ascending(key)
    };

    let once = view::project(store.reports(), &filter, Some(sort));
    assert!(once.iter().all(|r| filter.matches(r)));

    // Projecting the projection changes nothing
    let twice = view::project(&once, &filter, Some(sort));
    assert_eq!(once, twice);

    // Grouping never invents records; Custom statuses may be dropped
    let board = view::group_by_status(store.reports());
    assert!(board.len() <= store.len());

    // Advancing an arbitrary id is panic-free whether or not it exists
    let _ = store.advance_status(&input.advance_id);

    // Name parsers swallow foreign text without panicking
    let _ = Status::parse(&input.advance_id);
    let _ = Department::parse(&input.advance_id);
    let _ = SortKey::parse(&input.advance_id);

    // Whatever survived still serializes
    let _ = serde_json::to_string(&once);
});
