use anyhow::Result;
use serde::Serialize;

use crate::models::Employee;
use crate::session::Directory;
use crate::stats::{self, StatusCounts};
use crate::store::ReportStore;

const TOP_PERFORMER_LIMIT: usize = 3;

#[derive(Serialize)]
struct Dashboard {
    counts: StatusCounts,
    top_performers: Vec<Employee>,
}

pub fn run(store: &ReportStore, directory: &Directory, json: bool) -> Result<()> {
    let counts = stats::summarize(store.reports());
    let top_performers = stats::top_performers(directory.employees(), TOP_PERFORMER_LIMIT);

    if json {
        let dashboard = Dashboard {
            counts,
            top_performers,
        };
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("Department Insights");
    println!();
    println!("  Total Submitted: {:>4}", counts.submitted);
    println!("  Reported:        {:>4}", counts.reported);
    println!("  In Progress:     {:>4}", counts.in_progress);
    println!("  Resolved:        {:>4}", counts.resolved);
    if counts.sos > 0 {
        println!("  SOS:             {:>4}", counts.sos);
    }

    println!();
    println!("Top Performers");
    for employee in &top_performers {
        println!("  {:<20} {:>4} pts", employee.name, employee.points);
    }

    Ok(())
}
