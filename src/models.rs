use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status values accepted by [`Status::parse`].
pub const VALID_STATUSES: [&str; 4] = ["reported", "in_progress", "resolved", "sos"];

/// Lifecycle status of a civic report.
///
/// `Reported` is the entry state; the legacy "pending" spelling parses to
/// the same variant. `Sos` is the out-of-band emergency status injected by
/// the alert feed. `Custom` carries any raw value outside the defined set
/// (detail placeholders use "unknown") so that display and grouping code
/// never choke on foreign data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Reported,
    InProgress,
    Resolved,
    Sos,
    #[serde(untagged)]
    Custom(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Reported => "reported",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Sos => "sos",
            Self::Custom(value) => value,
        }
    }

    /// Parse a user-supplied status name. Accepts the legacy "pending"
    /// spelling for `Reported` and hyphenated "in-progress".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reported" | "pending" => Some(Self::Reported),
            "in_progress" | "in-progress" | "inprogress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "sos" => Some(Self::Sos),
            _ => None,
        }
    }

    /// Next status in the monotonic order Reported -> InProgress -> Resolved.
    ///
    /// Everything past the entry state moves straight to `Resolved`, which
    /// is terminal. `Sos` reports resolve on their first advance.
    pub fn advanced(&self) -> Self {
        match self {
            Self::Reported => Self::InProgress,
            _ => Self::Resolved,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Department names accepted by [`Department::parse`].
pub const VALID_DEPARTMENTS: [&str; 6] = [
    "Public Works",
    "Electrical",
    "Sanitation",
    "Water Supply",
    "Traffic",
    "Parks & Recreation",
];

/// Municipal department a report is routed to. Fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Public Works")]
    PublicWorks,
    Electrical,
    Sanitation,
    #[serde(rename = "Water Supply")]
    WaterSupply,
    Traffic,
    #[serde(rename = "Parks & Recreation")]
    ParksRecreation,
}

impl Department {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PublicWorks => "Public Works",
            Self::Electrical => "Electrical",
            Self::Sanitation => "Sanitation",
            Self::WaterSupply => "Water Supply",
            Self::Traffic => "Traffic",
            Self::ParksRecreation => "Parks & Recreation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "public works" | "public_works" => Some(Self::PublicWorks),
            "electrical" => Some(Self::Electrical),
            "sanitation" => Some(Self::Sanitation),
            "water supply" | "water_supply" => Some(Self::WaterSupply),
            "traffic" => Some(Self::Traffic),
            "parks & recreation" | "parks" => Some(Self::ParksRecreation),
            _ => None,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A civic issue report, whether filed by a citizen or injected by the
/// alert feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Display name of the citizen who filed the report.
    pub reporter: String,
    pub department: Department,
    pub status: Status,
    /// Key into the city coordinate table; free text for foreign records.
    pub location: String,
    pub reported_at: DateTime<Utc>,
}

impl Report {
    /// Fallback record for detail lookups that miss. Rendered instead of an
    /// error so an unknown id never fails the request.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Report {}", id),
            description: "Details are not available for this report.".to_string(),
            reporter: "Unknown".to_string(),
            department: Department::PublicWorks,
            status: Status::Custom("unknown".to_string()),
            location: "Unknown Location".to_string(),
            reported_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// An employee in the fixed directory. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub department: Department,
    /// Gamification score shown on the dashboard leaderboard.
    pub points: u32,
}

/// Sort keys accepted by [`SortKey::parse`].
pub const VALID_SORT_KEYS: [&str; 7] = [
    "id",
    "title",
    "reporter",
    "department",
    "status",
    "location",
    "date",
];

/// Field a report listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Id,
    Title,
    Reporter,
    Department,
    Status,
    Location,
    Date,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Reporter => "reporter",
            Self::Department => "department",
            Self::Status => "status",
            Self::Location => "location",
            Self::Date => "date",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" => Some(Self::Id),
            "title" | "desc" | "description" => Some(Self::Title),
            "reporter" | "user" | "name" => Some(Self::Reporter),
            "department" | "dept" => Some(Self::Department),
            "status" => Some(Self::Status),
            "location" => Some(Self::Location),
            "date" | "reported" => Some(Self::Date),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single active ordering for a view: one key, one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub const fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// Department + status predicate for report listings. `None` means "All";
/// both filters default to all-pass and compose with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub department: Option<Department>,
    pub status: Option<Status>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        let dept_ok = self
            .department
            .map_or(true, |dept| report.department == dept);
        let status_ok = self
            .status
            .as_ref()
            .map_or(true, |status| report.status == *status);
        dept_ok && status_ok
    }
}
