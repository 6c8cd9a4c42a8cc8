//! Adapter for the external modelling engine.
//!
//! ```text
//!   connect(config) ──► EngineSession::Connected(Connection)   ── Engine trait
//!                  └──► EngineSession::Unavailable(reason)      (demo / attach failed)
//! ```
//!
//! Every operation is attempted exactly once; failures are returned to the
//! caller as [`EngineError`]. A connection is released when it is dropped.
pub mod bridge;
pub mod command;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::EngineConfig;
use bridge::BridgeEngine;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("the modelling engine is not available ({0})")]
    ConnectionUnavailable(UnavailableReason),

    #[error("failed to get the project folder from the engine: {0}")]
    ProjectQuery(String),

    #[error("engine rejected command `{command}`: {reason}")]
    CommandRejected { command: String, reason: String },

    #[error("error exporting {dataset} to CSV: {reason}")]
    ExportFailed { dataset: String, reason: String },
}

// ---------------------------------------------------------------------------
// Engine – the automation surface used by this application
// ---------------------------------------------------------------------------

/// A live automation session with the engine.
///
/// Errors are plain messages; [`EngineSession`] wraps them with the context of
/// the operation that failed.
pub trait Engine {
    /// Working folder of the active project, as reported by the engine.
    fn project_folder(&mut self) -> Result<String, String>;

    /// Execute one command line.
    fn parse_command(&mut self, command: &str) -> Result<(), String>;

    /// Release the automation session.
    fn release(&mut self) -> Result<(), String>;
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Why no engine is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    DemoMode,
    ConnectFailed(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::DemoMode => write!(f, "running in demo mode"),
            UnavailableReason::ConnectFailed(reason) => write!(f, "connection failed: {reason}"),
        }
    }
}

/// An attached engine; released on drop.
pub struct Connection {
    engine: Box<dyn Engine>,
    released: bool,
}

impl Connection {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self {
            engine,
            released: false,
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match self.engine.release() {
            Ok(()) => log::info!("Engine session released"),
            Err(e) => log::error!("Error closing engine connection: {e}"),
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.release();
    }
}

/// The engine session for one pipeline pass.
pub enum EngineSession {
    Connected(Connection),
    Unavailable(UnavailableReason),
}

/// Folder of the engine's active project; exported CSVs land here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation(PathBuf);

impl ProjectLocation {
    /// Normalise Windows separators so the path joins cleanly everywhere.
    pub fn new(folder: &str) -> Self {
        ProjectLocation(PathBuf::from(folder.trim().replace('\\', "/")))
    }

    /// `<project>/<dataset>.csv`
    pub fn csv_path(&self, dataset: &str) -> PathBuf {
        self.0.join(format!("{dataset}.csv"))
    }
}

impl fmt::Display for ProjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Attach to the engine, or fall back to an unavailable session.
pub fn connect(config: &EngineConfig) -> EngineSession {
    if config.demo_mode {
        log::warn!("Running in demo mode - engine features are disabled");
        return EngineSession::Unavailable(UnavailableReason::DemoMode);
    }

    match BridgeEngine::attach(config) {
        Ok(engine) => EngineSession::connected(Box::new(engine)),
        Err(reason) => {
            log::warn!("Failed to connect to the modelling engine: {reason}");
            EngineSession::Unavailable(UnavailableReason::ConnectFailed(reason))
        }
    }
}

impl EngineSession {
    pub fn connected(engine: Box<dyn Engine>) -> Self {
        EngineSession::Connected(Connection::new(engine))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, EngineSession::Connected(_))
    }

    fn engine(&mut self) -> Result<&mut (dyn Engine + 'static), EngineError> {
        match self {
            EngineSession::Connected(conn) => Ok(conn.engine.as_mut()),
            EngineSession::Unavailable(reason) => {
                Err(EngineError::ConnectionUnavailable(reason.clone()))
            }
        }
    }

    /// Ask the engine for its active project folder.
    pub fn project_location(&mut self) -> Result<ProjectLocation, EngineError> {
        let folder = self
            .engine()?
            .project_folder()
            .map_err(EngineError::ProjectQuery)?;
        let location = ProjectLocation::new(&folder);
        log::info!("Engine project folder: {location}");
        Ok(location)
    }

    /// Export `dataset` to `<dataset>.csv` in the project folder.
    pub fn export_csv(&mut self, dataset: &str) -> Result<(), EngineError> {
        let cmd = command::export_csv(dataset);
        log::info!("Engine command: {cmd}");
        self.engine()?.parse_command(&cmd).map_err(|reason| {
            log::error!("Error exporting {dataset} to CSV: {reason}");
            EngineError::ExportFailed {
                dataset: dataset.to_string(),
                reason,
            }
        })
    }

    /// Composite `input` into `output`, then export `output` to CSV.
    ///
    /// A failed run may leave a stale `output` inside the engine's project.
    pub fn composite(
        &mut self,
        input: &str,
        output: &str,
        zone: &str,
        interval: u32,
    ) -> Result<(), EngineError> {
        let cmd = command::composite(input, output, zone, interval);
        log::info!("Engine command: {cmd}");
        self.engine()?.parse_command(&cmd).map_err(|reason| {
            log::error!("Error processing drillhole composites: {reason}");
            EngineError::CommandRejected {
                command: cmd.clone(),
                reason,
            }
        })?;
        self.export_csv(output)
    }

    /// Release the session now. Failures are logged, never raised.
    pub fn disconnect(self) {
        if let EngineSession::Connected(mut conn) = self {
            conn.release();
        }
    }
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------

#[cfg(test)]
pub mod mock {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::rc::Rc;

    use super::Engine;

    /// Shared log of what a [`MockEngine`] was asked to do.
    #[derive(Debug, Default)]
    pub struct Journal {
        pub commands: Vec<String>,
        pub releases: usize,
    }

    /// Records commands and writes canned CSV exports into `folder`.
    pub struct MockEngine {
        pub folder: PathBuf,
        pub exports: HashMap<String, String>,
        pub reject_prefix: Option<String>,
        pub fail_release: bool,
        pub journal: Rc<RefCell<Journal>>,
    }

    impl MockEngine {
        pub fn new(folder: PathBuf) -> (Self, Rc<RefCell<Journal>>) {
            let journal = Rc::new(RefCell::new(Journal::default()));
            let engine = MockEngine {
                folder,
                exports: HashMap::new(),
                reject_prefix: None,
                fail_release: false,
                journal: Rc::clone(&journal),
            };
            (engine, journal)
        }

        pub fn with_export(mut self, dataset: &str, csv: &str) -> Self {
            self.exports.insert(dataset.to_string(), csv.to_string());
            self
        }

        pub fn rejecting(mut self, prefix: &str) -> Self {
            self.reject_prefix = Some(prefix.to_string());
            self
        }
    }

    impl Engine for MockEngine {
        fn project_folder(&mut self) -> Result<String, String> {
            Ok(self.folder.to_string_lossy().into_owned())
        }

        fn parse_command(&mut self, command: &str) -> Result<(), String> {
            self.journal.borrow_mut().commands.push(command.to_string());
            if let Some(prefix) = &self.reject_prefix {
                if command.starts_with(prefix.as_str()) {
                    return Err(format!("{prefix} failed"));
                }
            }
            if let Some(rest) = command.strip_prefix("output &IN=") {
                let dataset = rest.split_whitespace().next().unwrap_or_default();
                let csv = self
                    .exports
                    .get(dataset)
                    .ok_or_else(|| format!("no dataset {dataset}"))?;
                std::fs::write(self.folder.join(format!("{dataset}.csv")), csv)
                    .map_err(|e| e.to_string())?;
            }
            Ok(())
        }

        fn release(&mut self) -> Result<(), String> {
            self.journal.borrow_mut().releases += 1;
            if self.fail_release {
                Err("COM teardown failed".to_string())
            } else {
                Ok(())
            }
        }
    }
}
