use chrono::Utc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::console::Event;
use crate::models::{Department, Report, Status};

/// The emergency records the demo feed injects. Fresh timestamps each call;
/// the ids stay fixed so repeated injection stays idempotent at the store.
pub fn alert_batch() -> Vec<Report> {
    vec![
        Report {
            id: "S001".to_string(),
            title: "Cyclone Shelter Opened".to_string(),
            description: "High winds expected along the coast overnight. \
                          Shelter at the town hall is open."
                .to_string(),
            reporter: "District Control Room".to_string(),
            department: Department::PublicWorks,
            status: Status::Sos,
            location: "Puri".to_string(),
            reported_at: Utc::now(),
        },
        Report {
            id: "S002".to_string(),
            title: "Flooded Underpass".to_string(),
            description: "Two vehicles stranded under the railway underpass. \
                          Divert traffic via Ring Road."
                .to_string(),
            reporter: "District Control Room".to_string(),
            department: Department::Traffic,
            status: Status::Sos,
            location: "Cuttack".to_string(),
            reported_at: Utc::now(),
        },
    ]
}

/// Fire-once timer that delivers the SOS alert batch to the console loop
/// after a fixed delay.
///
/// The handle owns the countdown: dropping it, or calling [`cancel`], stops
/// a pending timer so the batch is never delivered. The timer thread never
/// touches the store itself; it only sends an event, and the console thread
/// performs the appends.
///
/// [`cancel`]: AlertTimer::cancel
pub struct AlertTimer {
    cancel: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl AlertTimer {
    /// Arm the timer. After `delay` it sends [`Event::Alert`] once on
    /// `events` and exits.
    pub fn spawn(delay: Duration, events: Sender<Event>) -> Self {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || match cancel_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {
                info!("alert timer fired");
                // A send error means the console is already gone.
                let _ = events.send(Event::Alert(alert_batch()));
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                debug!("alert timer canceled before firing");
            }
        });
        Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    /// Stop a pending timer. Once this returns the batch has either already
    /// been queued (the timer beat the cancel) or never will be. Safe to
    /// call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // A send error just means the thread already finished.
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AlertTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
