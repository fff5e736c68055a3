use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Name of the per-checkout state directory.
pub const STATE_DIR_NAME: &str = ".saarthi";

/// Default delay before the demo SOS alert fires.
pub const DEFAULT_ALERT_DELAY: Duration = Duration::from_secs(30);

/// Runtime options resolved once at startup and threaded through the
/// console; nothing reads ambient process state after this.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the session marker.
    pub state_dir: PathBuf,
    pub alert_delay: Duration,
    pub alerts_enabled: bool,
}

impl Config {
    /// Resolve the state directory and freeze the alert settings.
    ///
    /// An explicit `state_dir` (flag or environment) wins and is created if
    /// missing. Otherwise the nearest `.saarthi` directory walking up from
    /// the current directory is used, falling back to creating one here.
    pub fn resolve(
        state_dir: Option<PathBuf>,
        alert_delay: Duration,
        alerts_enabled: bool,
    ) -> Result<Self> {
        let state_dir = match state_dir {
            Some(dir) => {
                fs::create_dir_all(&dir).context("Failed to create state directory")?;
                dir
            }
            None => find_or_create_state_dir()?,
        };
        debug!(state_dir = %state_dir.display(), "resolved state directory");

        Ok(Self {
            state_dir,
            alert_delay,
            alerts_enabled,
        })
    }
}

fn find_state_dir() -> Option<PathBuf> {
    let mut current = env::current_dir().ok()?;
    loop {
        let candidate = current.join(STATE_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn find_or_create_state_dir() -> Result<PathBuf> {
    if let Some(dir) = find_state_dir() {
        return Ok(dir);
    }
    let dir = env::current_dir()
        .context("Failed to read current directory")?
        .join(STATE_DIR_NAME);
    fs::create_dir_all(&dir).context("Failed to create state directory")?;
    Ok(dir)
}

/// Coordinates for the cities the demo data covers. Unknown locations
/// simply have no pin on the map.
pub fn city_coordinates(location: &str) -> Option<(f64, f64)> {
    match location {
        "Bhubaneswar" => Some((20.296059, 85.824539)),
        "Cuttack" => Some((20.462521, 85.882988)),
        "Puri" => Some((19.813457, 85.831207)),
        "Rourkela" => Some((22.227056, 84.861181)),
        _ => None,
    }
}
