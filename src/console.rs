use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

use crate::commands;
use crate::config::Config;
use crate::feed::AlertTimer;
use crate::models::Report;
use crate::session::{self, Directory, Session, SessionGate};
use crate::store::ReportStore;

/// What the event loop wakes up for.
pub enum Event {
    /// A line typed at the prompt.
    Line(String),
    /// The alert timer fired with its batch of SOS records.
    Alert(Vec<Report>),
    /// Stdin closed.
    Eof,
}

/// Grammar for one console line. `multicall` makes the first word the
/// command name, so `reports --json` parses without a leading binary name.
#[derive(Debug, Parser)]
#[command(name = "saarthi", multicall = true)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConsoleCommand {
    /// Log in as an employee
    Login {
        /// Employee ID
        employee_id: Option<String>,
        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and clear the session marker
    Logout,

    /// List reports, optionally filtered and sorted
    Reports {
        /// Filter by department, or "all"
        #[arg(short, long)]
        department: Option<String>,
        /// Filter by status, or "all"
        #[arg(short, long)]
        status: Option<String>,
        /// Sort key (id, title, reporter, department, status, location, date)
        #[arg(long)]
        sort: Option<String>,
        /// Reverse the sort order (requires --sort)
        #[arg(long)]
        desc: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show reports grouped into status columns
    Board {
        /// Per-column sort key
        #[arg(long)]
        sort_by: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one report in full
    Show {
        /// Report ID
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a report to the next status
    Advance {
        /// Report ID
        id: String,
    },

    /// Show report counts and top performers
    Dashboard {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Arm or cancel the SOS alert feed
    Alerts {
        /// "on" or "off"
        state: String,
    },

    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

/// Interactive front end. Owns the store, the session, and the alert timer;
/// everything else flows through [`Event`]s from the stdin reader thread and
/// the timer thread.
pub struct Console {
    config: Config,
    gate: SessionGate,
    session: Session,
    store: ReportStore,
    timer: Option<AlertTimer>,
    events_tx: Sender<Event>,
    events_rx: Receiver<Event>,
    /// Employee id waiting for its password; the next line is taken verbatim.
    pending_login: Option<String>,
}

impl Console {
    pub fn new(config: Config) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            config,
            gate: SessionGate::new(Directory::demo()),
            session: Session::new(),
            store: ReportStore::with_demo_data(),
            timer: None,
            events_tx,
            events_rx,
            pending_login: None,
        }
    }

    /// Run the console until quit, end of input, or a termination signal.
    pub fn run(&mut self) -> Result<()> {
        let term = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&term))
            .context("Failed to install SIGINT handler")?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&term))
            .context("Failed to install SIGTERM handler")?;

        if let Some(name) = session::read_marker(&self.config.state_dir) {
            // Sessions never resume from the marker; it only records the
            // last login.
            debug!(user = %name, "session marker left over from a previous run");
        }

        self.spawn_stdin_reader();
        if self.config.alerts_enabled {
            self.arm_timer();
        }

        println!("Saarthi civic report console. Type 'help' to list commands.");
        self.prompt();

        loop {
            if term.load(Ordering::Relaxed) {
                println!();
                break;
            }
            match self.events_rx.recv_timeout(Duration::from_millis(200)) {
                Ok(Event::Line(line)) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                    self.prompt();
                }
                Ok(Event::Alert(batch)) => {
                    self.deliver_alerts(batch);
                    self.prompt();
                }
                Ok(Event::Eof) => {
                    println!();
                    break;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        // A pending timer must not outlive the loop that would receive it.
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
        Ok(())
    }

    fn spawn_stdin_reader(&self) {
        let events = self.events_tx.clone();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if events.send(Event::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = events.send(Event::Eof);
        });
    }

    fn prompt(&self) {
        if self.pending_login.is_some() {
            print!("Password: ");
        } else {
            match self.session.user() {
                Some(user) => print!("{}@saarthi> ", user),
                None => print!("saarthi> "),
            }
        }
        let _ = io::stdout().flush();
    }

    /// Process one input line. Returns false when the console should stop.
    fn handle_line(&mut self, line: &str) -> bool {
        if let Some(employee_id) = self.pending_login.take() {
            self.attempt_login(&employee_id, line);
            return true;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return true;
        }

        match ConsoleLine::try_parse_from(trimmed.split_whitespace()) {
            Ok(parsed) => self.dispatch(parsed.command),
            Err(err) => {
                // Covers `help` output as well as bad input.
                let _ = err.print();
                true
            }
        }
    }

    fn dispatch(&mut self, command: ConsoleCommand) -> bool {
        if Self::requires_session(&command) && !self.session.is_authenticated() {
            eprintln!("Error: Please log in first.");
            return true;
        }

        let result = match command {
            ConsoleCommand::Login {
                employee_id,
                password,
            } => {
                let employee_id = employee_id.unwrap_or_default();
                match password {
                    Some(password) => {
                        self.attempt_login(&employee_id, &password);
                        return true;
                    }
                    None if !employee_id.is_empty() => {
                        self.pending_login = Some(employee_id);
                        return true;
                    }
                    // No id at all: let the gate produce its usual message.
                    None => {
                        self.attempt_login("", "");
                        return true;
                    }
                }
            }
            ConsoleCommand::Logout => {
                commands::login::logout(&mut self.session, &self.config.state_dir)
            }
            ConsoleCommand::Reports {
                department,
                status,
                sort,
                desc,
                json,
            } => commands::reports::run(
                &self.store,
                department.as_deref(),
                status.as_deref(),
                sort.as_deref(),
                desc,
                json,
            ),
            ConsoleCommand::Board { sort_by, json } => {
                commands::board::run(&self.store, sort_by.as_deref(), self.timer.is_some(), json)
            }
            ConsoleCommand::Show { id, json } => commands::show::run(&self.store, &id, json),
            ConsoleCommand::Advance { id } => commands::advance::run(&mut self.store, &id),
            ConsoleCommand::Dashboard { json } => {
                commands::dashboard::run(&self.store, self.gate.directory(), json)
            }
            ConsoleCommand::Alerts { state } => {
                self.set_alerts(&state);
                return true;
            }
            ConsoleCommand::Quit => return false,
        };

        if let Err(err) = result {
            eprintln!("Error: {}", err);
        }
        true
    }

    /// Commands that read or change report data need an authenticated
    /// session. `logout` stays open so it can always clear state.
    fn requires_session(command: &ConsoleCommand) -> bool {
        !matches!(
            command,
            ConsoleCommand::Login { .. } | ConsoleCommand::Logout | ConsoleCommand::Quit
        )
    }

    fn attempt_login(&mut self, employee_id: &str, password: &str) {
        if let Err(err) = commands::login::run(
            &self.gate,
            &mut self.session,
            &self.config.state_dir,
            employee_id,
            password,
        ) {
            eprintln!("Error: {}", err);
        }
    }

    fn set_alerts(&mut self, state: &str) {
        match state {
            "on" => {
                if self.timer.is_some() {
                    println!("SOS alert feed is already armed.");
                } else {
                    self.arm_timer();
                    println!(
                        "SOS alert feed armed; alerts arrive in {}s.",
                        self.config.alert_delay.as_secs()
                    );
                }
            }
            "off" => match self.timer.take() {
                Some(mut timer) => {
                    timer.cancel();
                    println!("SOS alert feed canceled.");
                }
                None => println!("SOS alert feed is not armed."),
            },
            other => {
                eprintln!("Error: Invalid alerts state '{}'. Must be one of: on, off", other);
            }
        }
    }

    fn arm_timer(&mut self) {
        self.timer = Some(AlertTimer::spawn(
            self.config.alert_delay,
            self.events_tx.clone(),
        ));
    }

    /// Fold a fired alert batch into the store and tell the user. The timer
    /// is spent at this point; `alerts on` arms a fresh one.
    fn deliver_alerts(&mut self, batch: Vec<Report>) {
        self.timer = None;

        let mut fresh = Vec::new();
        for report in batch {
            let id = report.id.clone();
            if self.store.append(report) {
                fresh.push(id);
            } else {
                debug!(id = %id, "alert record already present");
            }
        }
        if fresh.is_empty() {
            return;
        }

        println!();
        if fresh.len() == 1 {
            println!("SOS alert received: {}", fresh[0]);
        } else {
            println!("SOS alerts received: {}", fresh.join(", "));
        }
        println!("Run 'board' to see the SOS column.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed;
    use crate::models::Status;
    use clap::error::ErrorKind;
    use tempfile::tempdir;

    fn console(state_dir: &std::path::Path) -> Console {
        Console::new(Config {
            state_dir: state_dir.to_path_buf(),
            alert_delay: Duration::from_secs(60),
            alerts_enabled: false,
        })
    }

    #[test]
    fn test_parse_reports_line() {
        let line = ConsoleLine::try_parse_from(
            "reports --department Electrical --sort date --desc --json".split_whitespace(),
        )
        .unwrap();
        match line.command {
            ConsoleCommand::Reports {
                department,
                status,
                sort,
                desc,
                json,
            } => {
                assert_eq!(department.as_deref(), Some("Electrical"));
                assert_eq!(status, None);
                assert_eq!(sort.as_deref(), Some("date"));
                assert!(desc);
                assert!(json);
            }
            other => panic!("parsed {:?}", other),
        }
    }

    #[test]
    fn test_parse_login_variants() {
        let line = ConsoleLine::try_parse_from(["login", "E001"]).unwrap();
        match line.command {
            ConsoleCommand::Login {
                employee_id,
                password,
            } => {
                assert_eq!(employee_id.as_deref(), Some("E001"));
                assert_eq!(password, None);
            }
            other => panic!("parsed {:?}", other),
        }

        let line = ConsoleLine::try_parse_from(["login", "E001", "--password", "1234"]).unwrap();
        match line.command {
            ConsoleCommand::Login { password, .. } => {
                assert_eq!(password.as_deref(), Some("1234"));
            }
            other => panic!("parsed {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_command_is_an_error() {
        let err = ConsoleLine::try_parse_from(["frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_help_is_handled_by_the_parser() {
        let err = ConsoleLine::try_parse_from(["help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_quit_and_exit_stop_the_loop() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        assert!(!console.handle_line("quit"));
        assert!(!console.handle_line("exit"));
    }

    #[test]
    fn test_blank_line_keeps_running() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        assert!(console.handle_line(""));
        assert!(console.handle_line("   "));
    }

    #[test]
    fn test_data_commands_require_login() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        assert!(console.handle_line("advance R001"));
        // The gate swallowed the command; nothing changed.
        assert_eq!(console.store.get("R001").unwrap().status, Status::Reported);
    }

    #[test]
    fn test_leftover_marker_does_not_restore_session() {
        let dir = tempdir().unwrap();
        session::write_marker(dir.path(), "Ananya Gupta").unwrap();

        // A marker from a previous run is a record of the last login, never
        // a session.
        let mut console = console(dir.path());
        assert!(!console.session.is_authenticated());
        assert!(console.handle_line("advance R001"));
        assert_eq!(console.store.get("R001").unwrap().status, Status::Reported);
    }

    #[test]
    fn test_login_then_advance() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        assert!(console.handle_line("login E001 --password 1234"));
        assert_eq!(console.session.user(), Some("Ananya Gupta"));
        assert!(console.handle_line("advance R001"));
        assert_eq!(
            console.store.get("R001").unwrap().status,
            Status::InProgress
        );
    }

    #[test]
    fn test_password_prompt_flow() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        assert!(console.handle_line("login E002"));
        assert!(console.pending_login.is_some());
        assert!(!console.session.is_authenticated());

        // The next line is the password.
        assert!(console.handle_line("1234"));
        assert_eq!(console.session.user(), Some("Vikram Singh"));
        assert!(console.pending_login.is_none());
    }

    #[test]
    fn test_wrong_password_in_prompt_flow() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        console.handle_line("login E002");
        console.handle_line("9999");
        assert!(!console.session.is_authenticated());
        // The pending id is consumed either way.
        assert!(console.pending_login.is_none());
    }

    #[test]
    fn test_bare_login_reports_missing_credentials() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        assert!(console.handle_line("login"));
        assert!(!console.session.is_authenticated());
        assert!(console.pending_login.is_none());
    }

    #[test]
    fn test_logout_without_login_is_fine() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        assert!(console.handle_line("logout"));
        assert!(console.handle_line("logout"));
    }

    #[test]
    fn test_alerts_toggle() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        console.handle_line("login E001 --password 1234");
        assert!(console.timer.is_none());

        console.handle_line("alerts on");
        assert!(console.timer.is_some());

        console.handle_line("alerts off");
        assert!(console.timer.is_none());
    }

    #[test]
    fn test_alerts_rejects_other_states() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        console.handle_line("login E001 --password 1234");
        assert!(console.handle_line("alerts maybe"));
        assert!(console.timer.is_none());
    }

    #[test]
    fn test_alert_delivery_appends_and_disarms() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        console.handle_line("login E001 --password 1234");
        console.handle_line("alerts on");

        console.deliver_alerts(feed::alert_batch());
        assert!(console.timer.is_none());
        assert_eq!(console.store.get("S001").unwrap().status, Status::Sos);
        assert_eq!(console.store.get("S002").unwrap().status, Status::Sos);

        // Delivering the same batch again changes nothing.
        let len = console.store.len();
        console.deliver_alerts(feed::alert_batch());
        assert_eq!(console.store.len(), len);
    }

    #[test]
    fn test_relogin_switches_user() {
        let dir = tempdir().unwrap();
        let mut console = console(dir.path());
        console.handle_line("login E001 --password 1234");
        console.handle_line("login E003 --password 1234");
        assert_eq!(console.session.user(), Some("Meena Nair"));
    }
}
