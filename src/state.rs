use std::path::Path;

use crate::config::{Config, EngineConfig};
use crate::engine::{self, EngineSession, UnavailableReason};
use crate::intake;
use crate::pipeline::{AnalysisReport, CompositeParameters, PipelineError, RunContext};

/// Remediation hints shown under every run failure.
pub const ERROR_HINTS: &str = "Please check if:\n\
                               1. The file format is correct\n\
                               2. The modelling engine is running\n\
                               3. You have necessary permissions";

/// Opens the engine session for one pipeline pass.
pub type Connector = Box<dyn Fn(&EngineConfig) -> EngineSession>;

// ---------------------------------------------------------------------------
// Notices shown in the input panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Which output tab is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisTab {
    #[default]
    Length,
    Grade,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Pipeline context of the current upload (None until a file is picked).
    pub run: Option<RunContext>,

    /// Composite length in metres.
    pub composite_length: u32,
    pub zone_column: Option<String>,
    pub grade_column: Option<String>,

    /// Result of the last successful analysis.
    pub report: Option<AnalysisReport>,
    pub active_tab: AnalysisTab,

    /// Status / error messages, newest last.
    pub notices: Vec<Notice>,

    connector: Connector,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, Box::new(engine::connect))
    }

    pub fn with_connector(config: Config, connector: Connector) -> Self {
        Self {
            config,
            run: None,
            composite_length: 1,
            zone_column: None,
            grade_column: None,
            report: None,
            active_tab: AnalysisTab::default(),
            notices: Vec::new(),
            connector,
        }
    }

    /// Column names of the prepared raw dataset.
    pub fn columns(&self) -> &[String] {
        self.run.as_ref().map(|r| r.columns.as_slice()).unwrap_or(&[])
    }

    pub fn can_run(&self) -> bool {
        self.run.as_ref().is_some_and(RunContext::is_prepared)
            && self.zone_column.is_some()
            && self.grade_column.is_some()
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
    }

    fn report_error(&mut self, err: PipelineError) {
        log::error!("Run failed: {err}");
        self.notify(NoticeLevel::Error, format!("An unexpected error occurred: {err}"));
        self.notify(NoticeLevel::Info, ERROR_HINTS);
    }

    fn report_unavailable(&mut self, reason: &UnavailableReason) {
        let text = match reason {
            UnavailableReason::DemoMode => {
                "Running in demo mode - modelling engine features are limited".to_string()
            }
            UnavailableReason::ConnectFailed(why) => {
                format!("Failed to connect to the modelling engine ({why}). Running in demo mode.")
            }
        };
        self.notify(NoticeLevel::Warning, text);
    }

    /// Open an engine session, or report why there is none.
    fn open_session(&mut self) -> Option<EngineSession> {
        let session = (self.connector)(&self.config.engine);
        if session.is_available() {
            return Some(session);
        }
        if let EngineSession::Unavailable(reason) = session {
            self.report_unavailable(&reason);
        }
        None
    }

    /// Store a picked file and prepare it for analysis.
    pub fn ingest_upload(&mut self, source: &Path) {
        self.notices.clear();
        self.report = None;
        self.run = None;

        match intake::ingest_file(&self.config.uploads_dir, source) {
            Ok(upload) => {
                self.notify(
                    NoticeLevel::Success,
                    format!("File {}.dm uploaded successfully!", upload.base_name),
                );
                self.run = Some(RunContext::new(upload));
                self.prepare();
            }
            Err(e) => self.report_error(PipelineError::Intake(e)),
        }
    }

    /// Resolve the project and export the raw dataset (once per upload).
    pub fn prepare(&mut self) {
        let Some(mut session) = self.open_session() else {
            return;
        };
        let result = match self.run.as_mut() {
            Some(ctx) => ctx.prepare(&mut session),
            None => Err(PipelineError::NotPrepared),
        };
        session.disconnect();

        match result {
            Ok(()) => self.select_default_columns(),
            Err(e) => self.report_error(e),
        }
    }

    /// Keep the current selections when still valid, else pick the first column.
    fn select_default_columns(&mut self) {
        let columns = self.columns().to_vec();
        let keep = |current: &Option<String>| {
            current
                .as_ref()
                .filter(|c| columns.contains(c))
                .cloned()
                .or_else(|| columns.first().cloned())
        };
        self.zone_column = keep(&self.zone_column);
        self.grade_column = keep(&self.grade_column);
    }

    /// Composite the prepared dataset and build the comparison report.
    pub fn run_analysis(&mut self) {
        self.notices.retain(|n| n.level == NoticeLevel::Success);
        let (Some(zone), Some(grade)) = (self.zone_column.clone(), self.grade_column.clone()) else {
            self.notify(NoticeLevel::Info, "Select the zone and grade fields first.");
            return;
        };
        let Some(mut session) = self.open_session() else {
            return;
        };

        let interval = self.composite_length;
        let result = match self.run.as_mut() {
            Some(ctx) => CompositeParameters::new(&zone, interval, &ctx.columns)
                .and_then(|params| ctx.run_analysis(&mut session, &params, &grade)),
            None => Err(PipelineError::NotPrepared),
        };
        session.disconnect();

        match result {
            Ok(report) => {
                self.notify(
                    NoticeLevel::Success,
                    format!(
                        "Composite analysis completed! Output file: {}.dm",
                        report.output_name
                    ),
                );
                self.report = Some(report);
            }
            Err(e) => {
                self.report = None;
                self.report_error(e);
            }
        }
    }

    /// Write the comparison table of `tab` to `path`.
    pub fn save_comparison_to(&mut self, tab: AnalysisTab, path: &Path) {
        let Some(report) = &self.report else {
            return;
        };
        let table = match tab {
            AnalysisTab::Length => &report.length.table,
            AnalysisTab::Grade => &report.grade.table,
        };
        let column = table.column.clone();

        match table.write_csv(path) {
            Ok(()) => {
                log::info!("Saved {column} comparison to {}", path.display());
                self.notify(NoticeLevel::Success, format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save {column} comparison table: {e:#}");
                self.notify(NoticeLevel::Error, format!("Error: {e:#}"));
            }
        }
    }
}
