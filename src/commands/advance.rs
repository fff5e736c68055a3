use anyhow::{bail, Result};

use crate::store::ReportStore;

/// Moves a report one step along the workflow and reports the new status.
pub fn run(store: &mut ReportStore, id: &str) -> Result<()> {
    match store.advance_status(id) {
        Some(status) => {
            println!("Report {} is now {}", id, status);
            Ok(())
        }
        None => bail!("Report {} not found", id),
    }
}
