use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{Department, Employee};

/// Fixed key under which the logged-in display name is persisted.
pub const SESSION_MARKER: &str = "saarthiUser";

/// Why an authentication attempt was rejected.
///
/// `MissingCredentials` and `MalformedEmployeeId` are validation failures
/// caught before any directory lookup. `InvalidCredentials` covers both an
/// unknown id and a wrong password with one message, so the error never
/// reveals which ids exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingCredentials,
    MalformedEmployeeId,
    InvalidCredentials,
}

impl AuthFailure {
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingCredentials => "Employee ID and password are required.",
            Self::MalformedEmployeeId => "Employee ID should contain only letters and digits.",
            Self::InvalidCredentials => "Invalid Employee ID or Password",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AuthFailure {}

/// The employee directory plus the secret every employee shares. Built once
/// at startup and handed to the gate; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Directory {
    employees: Vec<Employee>,
    secret: String,
}

impl Directory {
    pub fn new(employees: Vec<Employee>, secret: impl Into<String>) -> Self {
        Self {
            employees,
            secret: secret.into(),
        }
    }

    /// The demo directory: three employees, one shared password.
    pub fn demo() -> Self {
        Self::new(
            vec![
                Employee {
                    id: "E001".to_string(),
                    name: "Ananya Gupta".to_string(),
                    department: Department::PublicWorks,
                    points: 150,
                },
                Employee {
                    id: "E002".to_string(),
                    name: "Vikram Singh".to_string(),
                    department: Department::Electrical,
                    points: 120,
                },
                Employee {
                    id: "E003".to_string(),
                    name: "Meena Nair".to_string(),
                    department: Department::Sanitation,
                    points: 95,
                },
            ],
            "1234",
        )
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn lookup(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }
}

/// Credential check against the fixed directory.
///
/// This is a demo gate, not a security boundary: one shared plaintext
/// password, no hashing, no rate limiting, no lockout. Do not put it in
/// front of anything with real stakes.
pub struct SessionGate {
    directory: Directory,
}

impl SessionGate {
    pub fn new(directory: Directory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Check an id/password pair. Success returns the employee's display
    /// name for the caller to install into the session.
    ///
    /// Validation runs before any lookup; both authentication failure causes
    /// share one generic message.
    pub fn authenticate(&self, employee_id: &str, secret: &str) -> Result<String, AuthFailure> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() || secret.is_empty() {
            return Err(AuthFailure::MissingCredentials);
        }
        if !employee_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AuthFailure::MalformedEmployeeId);
        }

        match self.directory.lookup(employee_id) {
            Some(employee) if secret == self.directory.secret => {
                info!(employee_id, "login succeeded");
                Ok(employee.name.clone())
            }
            _ => {
                debug!(employee_id, "login rejected");
                Err(AuthFailure::InvalidCredentials)
            }
        }
    }
}

/// The authenticated user, or nobody. Owned by the console; only a
/// successful credential check populates it and only logout clears it.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, display_name: String) {
        self.user = Some(display_name);
    }

    /// Unconditional and idempotent.
    pub fn logout(&mut self) {
        self.user = None;
    }
}

fn marker_path(state_dir: &Path) -> PathBuf {
    state_dir.join(SESSION_MARKER)
}

/// Persist the logged-in display name under the fixed marker key.
pub fn write_marker(state_dir: &Path, display_name: &str) -> Result<()> {
    fs::write(marker_path(state_dir), display_name).context("Failed to write session marker")
}

/// Remove the marker. Idempotent: a missing marker is not an error.
pub fn clear_marker(state_dir: &Path) -> Result<()> {
    match fs::remove_file(marker_path(state_dir)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove session marker"),
    }
}

/// Read a previously written marker, if any.
///
/// Nothing restores a session from this at startup; the stored name only
/// records who logged in last.
pub fn read_marker(state_dir: &Path) -> Option<String> {
    let name = fs::read_to_string(marker_path(state_dir)).ok()?;
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn gate() -> SessionGate {
        SessionGate::new(Directory::demo())
    }

    // ==================== Unit Tests ====================

    #[test]
    fn test_known_id_with_shared_secret_succeeds() {
        let gate = gate();
        assert_eq!(gate.authenticate("E001", "1234"), Ok("Ananya Gupta".to_string()));
        assert_eq!(gate.authenticate("E002", "1234"), Ok("Vikram Singh".to_string()));
        assert_eq!(gate.authenticate("E003", "1234"), Ok("Meena Nair".to_string()));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let gate = gate();
        assert_eq!(
            gate.authenticate("E001", "12345"),
            Err(AuthFailure::InvalidCredentials)
        );
    }

    #[test]
    fn test_unknown_id_fails() {
        let gate = gate();
        assert_eq!(
            gate.authenticate("E999", "1234"),
            Err(AuthFailure::InvalidCredentials)
        );
    }

    #[test]
    fn test_failure_message_identical_for_both_causes() {
        let gate = gate();
        let unknown_id = gate.authenticate("E999", "1234").unwrap_err();
        let bad_secret = gate.authenticate("E001", "9999").unwrap_err();
        assert_eq!(unknown_id.to_string(), bad_secret.to_string());
        assert_eq!(unknown_id.message(), "Invalid Employee ID or Password");
    }

    #[test]
    fn test_empty_credentials_rejected_before_lookup() {
        let gate = gate();
        assert_eq!(
            gate.authenticate("", "1234"),
            Err(AuthFailure::MissingCredentials)
        );
        // A known id with an empty password is still a validation failure,
        // not an authentication failure.
        assert_eq!(
            gate.authenticate("E001", ""),
            Err(AuthFailure::MissingCredentials)
        );
    }

    #[test]
    fn test_non_alphanumeric_id_rejected() {
        let gate = gate();
        assert_eq!(
            gate.authenticate("E-001", "1234"),
            Err(AuthFailure::MalformedEmployeeId)
        );
        assert_eq!(
            gate.authenticate("E0 01", "1234"),
            Err(AuthFailure::MalformedEmployeeId)
        );
    }

    #[test]
    fn test_id_is_case_sensitive() {
        let gate = gate();
        assert_eq!(
            gate.authenticate("e001", "1234"),
            Err(AuthFailure::InvalidCredentials)
        );
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());

        session.login("Ananya Gupta".to_string());
        assert_eq!(session.user(), Some("Ananya Gupta"));

        session.logout();
        assert!(!session.is_authenticated());
        // Idempotent.
        session.logout();
        assert!(session.user().is_none());
    }

    #[test]
    fn test_marker_round_trip() {
        let dir = tempdir().unwrap();
        write_marker(dir.path(), "Ananya Gupta").unwrap();
        assert_eq!(read_marker(dir.path()), Some("Ananya Gupta".to_string()));

        clear_marker(dir.path()).unwrap();
        assert_eq!(read_marker(dir.path()), None);
    }

    #[test]
    fn test_clear_marker_is_idempotent() {
        let dir = tempdir().unwrap();
        assert!(clear_marker(dir.path()).is_ok());
        assert!(clear_marker(dir.path()).is_ok());
    }

    #[test]
    fn test_read_marker_missing_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("does-not-exist");
        assert_eq!(read_marker(&nested), None);
    }

    // ==================== Property-Based Tests ====================

    proptest! {
        #[test]
        fn prop_unknown_ids_fail_regardless_of_secret(
            id in "[A-DF-Za-df-z][0-9]{3}",
            secret in "[0-9]{1,8}",
        ) {
            // Ids starting with E could collide with the directory; the
            // generator skips that letter entirely.
            let gate = gate();
            prop_assert_eq!(
                gate.authenticate(&id, &secret),
                Err(AuthFailure::InvalidCredentials)
            );
        }

        #[test]
        fn prop_known_id_succeeds_iff_secret_matches(secret in "[0-9]{1,8}") {
            let gate = gate();
            let result = gate.authenticate("E001", &secret);
            if secret == "1234" {
                prop_assert_eq!(result, Ok("Ananya Gupta".to_string()));
            } else {
                prop_assert_eq!(result, Err(AuthFailure::InvalidCredentials));
            }
        }

        #[test]
        fn prop_validation_precedes_lookup(id in "[A-Za-z0-9]{0,4}[:/-][A-Za-z0-9]{0,4}") {
            // The embedded separator survives trimming, so the id is always
            // malformed and never reaches the directory lookup.
            let gate = gate();
            prop_assert_eq!(
                gate.authenticate(&id, "1234"),
                Err(AuthFailure::MalformedEmployeeId)
            );
        }
    }
}
