use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use saarthi::config::Config;
use saarthi::console::Console;

#[derive(Parser)]
#[command(name = "saarthi")]
#[command(about = "A civic issue report console for municipal crews")]
#[command(version)]
struct Cli {
    /// Directory for session state (nearest .saarthi walking up from the
    /// current directory when unset)
    #[arg(long, env = "SAARTHI_DIR", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Seconds before the SOS alert feed fires
    #[arg(
        long,
        env = "SAARTHI_ALERT_DELAY",
        default_value_t = 30,
        value_name = "SECONDS"
    )]
    alert_delay: u64,

    /// Start with the SOS alert feed disarmed
    #[arg(long)]
    no_alerts: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// Logs go to stderr so the prompt and command output own stdout.
fn init_tracing(verbose: u8, log_json: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = Config::resolve(
        cli.state_dir,
        Duration::from_secs(cli.alert_delay),
        !cli.no_alerts,
    )?;

    let mut console = Console::new(config);
    console.run()
}
