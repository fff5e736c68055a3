use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::models::{Department, Report, Status};

/// In-memory, insertion-ordered collection of civic reports.
///
/// The store is the single owner of report records for the process lifetime.
/// Iteration order is insertion order; records injected later (the alert
/// feed) always land after everything seeded earlier. There is no removal
/// path and no persistence.
pub struct ReportStore {
    reports: Vec<Report>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }

    /// Populate a fresh store. Duplicate ids in the seed keep the first
    /// occurrence; later ones are dropped.
    pub fn seed(records: Vec<Report>) -> Self {
        let mut store = Self::new();
        for record in records {
            if !store.append(record) {
                warn!("duplicate id in seed data, keeping first occurrence");
            }
        }
        debug!(count = store.len(), "report store seeded");
        store
    }

    /// Store pre-loaded with the demo sample data.
    pub fn with_demo_data() -> Self {
        Self::seed(demo_reports())
    }

    /// Append a report to the end of the sequence. Keyed-idempotent: an id
    /// already present leaves the store unchanged and returns `false`.
    pub fn append(&mut self, report: Report) -> bool {
        if self.reports.iter().any(|r| r.id == report.id) {
            return false;
        }
        self.reports.push(report);
        true
    }

    /// Advance a report along Reported -> InProgress -> Resolved and return
    /// the new status. Unknown ids are a silent no-op (`None`); no other
    /// record is touched.
    pub fn advance_status(&mut self, id: &str) -> Option<Status> {
        let report = self.reports.iter_mut().find(|r| r.id == id)?;
        report.status = report.status.advanced();
        debug!(id, status = %report.status, "report status advanced");
        Some(report.status.clone())
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Lookup that never misses: unknown ids yield the placeholder record
    /// instead of an error.
    pub fn get_or_placeholder(&self, id: &str) -> Report {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| Report::placeholder(id))
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The sample reports the whole demo revolves around.
pub fn demo_reports() -> Vec<Report> {
    vec![
        Report {
            id: "R001".to_string(),
            title: "Pothole Issue".to_string(),
            description: "Pothole near MG Road".to_string(),
            reporter: "Ananya Gupta".to_string(),
            department: Department::PublicWorks,
            status: Status::Reported,
            location: "Bhubaneswar".to_string(),
            reported_at: seed_time(2025, 9, 10, 10, 0),
        },
        Report {
            id: "R002".to_string(),
            title: "Street Light Malfunction".to_string(),
            description: "Streetlight not working".to_string(),
            reporter: "Vikram Singh".to_string(),
            department: Department::Electrical,
            status: Status::InProgress,
            location: "Cuttack".to_string(),
            reported_at: seed_time(2025, 9, 11, 14, 30),
        },
        Report {
            id: "R003".to_string(),
            title: "Waste Management Issue".to_string(),
            description: "Overflowing trash bin".to_string(),
            reporter: "Meena Nair".to_string(),
            department: Department::Sanitation,
            status: Status::Resolved,
            location: "Puri".to_string(),
            reported_at: seed_time(2025, 9, 8, 9, 0),
        },
        Report {
            id: "R004".to_string(),
            title: "Infrastructure Damage".to_string(),
            description: "Broken bench".to_string(),
            reporter: "Rohit Kumar".to_string(),
            department: Department::PublicWorks,
            status: Status::Reported,
            location: "Rourkela".to_string(),
            reported_at: seed_time(2025, 9, 12, 8, 0),
        },
    ]
}
