use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config;
use crate::store::ReportStore;

/// Detail view for one report. An unknown id renders the placeholder record
/// instead of failing.
pub fn run(store: &ReportStore, id: &str, json: bool) -> Result<()> {
    let report = store.get_or_placeholder(id);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Report {}: {}", report.id, report.title);
    println!("Status: {}", report.status);
    println!("Department: {}", report.department);
    println!("Reporter: {}", report.reporter);
    match config::city_coordinates(&report.location) {
        Some((lat, lon)) => println!("Location: {} ({:.6}, {:.6})", report.location, lat, lon),
        None => println!("Location: {}", report.location),
    }
    // Placeholder records carry no meaningful timestamp.
    if report.reported_at != DateTime::<Utc>::MIN_UTC {
        println!(
            "Reported: {}",
            report.reported_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    if !report.description.is_empty() {
        println!("\nDescription:");
        for line in report.description.lines() {
            println!("  {}", line);
        }
    }

    Ok(())
}
