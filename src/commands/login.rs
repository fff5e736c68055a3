use anyhow::{bail, Result};
use std::path::Path;
use tracing::warn;

use crate::session::{self, Session, SessionGate};

pub fn run(
    gate: &SessionGate,
    session: &mut Session,
    state_dir: &Path,
    employee_id: &str,
    password: &str,
) -> Result<()> {
    match gate.authenticate(employee_id, password) {
        Ok(name) => {
            session.login(name.clone());
            // The live session is the source of truth; the marker is just a
            // record of who logged in last.
            if let Err(err) = session::write_marker(state_dir, &name) {
                warn!(error = %err, "session marker not updated");
            }
            println!("Logged in as {}", name);
            Ok(())
        }
        Err(failure) => bail!("{}", failure),
    }
}

pub fn logout(session: &mut Session, state_dir: &Path) -> Result<()> {
    match session.user() {
        Some(name) => println!("Logged out {}", name),
        None => println!("Not logged in."),
    }
    session.logout();
    session::clear_marker(state_dir)
}
