use thiserror::Error;

use crate::data::histogram::HistogramFigure;
use crate::data::loader::{load_csv, TableError};
use crate::data::model::TabularDataset;
use crate::data::stats::ComparisonTable;
use crate::engine::{EngineError, EngineSession, ProjectLocation};
use crate::intake::UploadedDataset;

/// Sample length column present in every drillhole export.
pub const LENGTH_COLUMN: &str = "LENGTH";

pub const MIN_INTERVAL: u32 = 1;
pub const MAX_INTERVAL: u32 = 1000;

const RAW_COLOR: &str = "lightgray";
const GRADE_COLOR: &str = "goldenrod";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("failed to store upload: {0}")]
    Intake(#[from] std::io::Error),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("no dataset has been prepared yet")]
    NotPrepared,
}

// ---------------------------------------------------------------------------
// CompositeParameters
// ---------------------------------------------------------------------------

/// User-chosen compositing settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeParameters {
    pub zone_column: String,
    /// Composite length in metres.
    pub interval: u32,
}

impl CompositeParameters {
    pub fn new(zone_column: &str, interval: u32, columns: &[String]) -> Result<Self, PipelineError> {
        if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&interval) {
            return Err(PipelineError::InvalidParameters(format!(
                "composite length {interval} is outside {MIN_INTERVAL}..={MAX_INTERVAL}"
            )));
        }
        if !columns.iter().any(|c| c == zone_column) {
            return Err(PipelineError::InvalidParameters(format!(
                "zone field '{zone_column}' is not a column of the dataset"
            )));
        }
        Ok(CompositeParameters {
            zone_column: zone_column.to_string(),
            interval,
        })
    }
}

// ---------------------------------------------------------------------------
// RunContext – state carried across the passes for one uploaded dataset
// ---------------------------------------------------------------------------

/// Pipeline state for one uploaded dataset.
///
/// A fresh context is created for every upload, so the one-shot raw export
/// never leaks from one dataset to the next.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub upload: UploadedDataset,
    pub project: Option<ProjectLocation>,
    pub columns: Vec<String>,
    raw_exported: bool,
}

impl RunContext {
    pub fn new(upload: UploadedDataset) -> Self {
        Self {
            upload,
            project: None,
            columns: Vec::new(),
            raw_exported: false,
        }
    }

    pub fn raw_exported(&self) -> bool {
        self.raw_exported
    }

    pub fn is_prepared(&self) -> bool {
        self.raw_exported() && !self.columns.is_empty()
    }

    /// Resolve the project, export the raw dataset once, and read its columns.
    pub fn prepare(&mut self, session: &mut EngineSession) -> Result<(), PipelineError> {
        let project = session.project_location()?;

        if !self.raw_exported {
            session.export_csv(&self.upload.base_name)?;
            self.raw_exported = true;
        }

        let raw = load_csv(&project.csv_path(&self.upload.base_name))?;
        self.columns = raw.column_names();
        self.project = Some(project);
        Ok(())
    }

    /// Composite the dataset, load both exports and compare them.
    pub fn run_analysis(
        &mut self,
        session: &mut EngineSession,
        params: &CompositeParameters,
        grade_column: &str,
    ) -> Result<AnalysisReport, PipelineError> {
        if !self.raw_exported() {
            return Err(PipelineError::NotPrepared);
        }

        let project = session.project_location()?;
        let input = &self.upload.base_name;
        let output = self.upload.composites_name();

        session.composite(input, &output, &params.zone_column, params.interval)?;
        log::info!("Composite analysis completed, output {output}.dm");

        let raw = load_csv(&project.csv_path(input))?;
        let composite = load_csv(&project.csv_path(&output))?;
        self.project = Some(project);

        AnalysisReport::build(params.clone(), output, &raw, &composite, grade_column)
    }
}

// ---------------------------------------------------------------------------
// AnalysisReport
// ---------------------------------------------------------------------------

/// Raw vs composite histograms and statistics of one column.
#[derive(Debug, Clone)]
pub struct ColumnComparison {
    pub column: String,
    pub raw: HistogramFigure,
    pub composite: HistogramFigure,
    pub table: ComparisonTable,
}

impl ColumnComparison {
    pub fn build(
        raw: &TabularDataset,
        composite: &TabularDataset,
        column: &str,
        interval: u32,
        color: &str,
    ) -> Result<Self, TableError> {
        let raw_fig = HistogramFigure::new(raw, column, format!("Raw {column} Distribution"), color)?;
        let comp_fig = HistogramFigure::new(
            composite,
            column,
            format!("Composite {column} Distribution (size: {interval}m)"),
            color,
        )?;
        let table = ComparisonTable::build(raw, composite, column)?;

        Ok(ColumnComparison {
            column: column.to_string(),
            raw: raw_fig,
            composite: comp_fig,
            table,
        })
    }
}

/// Everything the output view shows after one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub params: CompositeParameters,
    pub output_name: String,
    pub length: ColumnComparison,
    pub grade: ColumnComparison,
}

impl AnalysisReport {
    pub fn build(
        params: CompositeParameters,
        output_name: String,
        raw: &TabularDataset,
        composite: &TabularDataset,
        grade_column: &str,
    ) -> Result<Self, PipelineError> {
        let length = ColumnComparison::build(raw, composite, LENGTH_COLUMN, params.interval, RAW_COLOR)?;
        let grade = ColumnComparison::build(raw, composite, grade_column, params.interval, GRADE_COLOR)?;
        Ok(AnalysisReport {
            params,
            output_name,
            length,
            grade,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::{round_to, Metric};
    use crate::engine::mock::MockEngine;
    use crate::engine::UnavailableReason;
    use crate::intake::save_upload;

    const RAW_CSV: &str = "BHID,FROM,TO,LENGTH,ZONE,AU\n\
                           DH1,0,1,1,1,0.5\n\
                           DH1,1,3,2,1,1.5\n\
                           DH1,3,6,3,2,2.5\n\
                           DH1,6,10,4,2,3.5\n";

    const COMP_CSV: &str = "BHID,FROM,TO,LENGTH,ZONE,AU\n\
                            DH1,0,3,3,1,1.1667\n\
                            DH1,3,6,3,2,2.5\n\
                            DH1,6,9,3,2,3.5\n";

    fn context(dir: &std::path::Path) -> RunContext {
        RunContext::new(save_upload(&dir.join("uploads"), "hole1.dm", b"dm").unwrap())
    }

    fn columns() -> Vec<String> {
        ["BHID", "FROM", "TO", "LENGTH", "ZONE", "AU"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn parameters_are_validated() {
        assert!(CompositeParameters::new("ZONE", 5, &columns()).is_ok());
        assert!(CompositeParameters::new("ZONE", 0, &columns()).is_err());
        assert!(CompositeParameters::new("ZONE", 1001, &columns()).is_err());
        assert!(CompositeParameters::new("ROCK", 5, &columns()).is_err());
    }

    #[test]
    fn prepare_exports_raw_once() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, journal) = MockEngine::new(dir.path().to_path_buf());
        let mut session = EngineSession::connected(Box::new(engine.with_export("hole1", RAW_CSV)));
        let mut ctx = context(dir.path());

        ctx.prepare(&mut session).unwrap();
        ctx.prepare(&mut session).unwrap();

        assert!(ctx.is_prepared());
        assert_eq!(ctx.columns, columns());
        let exports = journal
            .borrow()
            .commands
            .iter()
            .filter(|c| c.starts_with("output"))
            .count();
        assert_eq!(exports, 1);
    }

    #[test]
    fn prepare_without_engine_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EngineSession::Unavailable(UnavailableReason::DemoMode);
        let mut ctx = context(dir.path());

        let err = ctx.prepare(&mut session).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Engine(EngineError::ConnectionUnavailable(_))
        ));
        assert!(!ctx.raw_exported());
    }

    #[test]
    fn empty_raw_export_fails_prepare() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _journal) = MockEngine::new(dir.path().to_path_buf());
        let mut session = EngineSession::connected(Box::new(
            engine.with_export("hole1", "BHID,FROM,TO,LENGTH\n"),
        ));
        let mut ctx = context(dir.path());

        let err = ctx.prepare(&mut session).unwrap_err();
        assert!(matches!(err, PipelineError::Table(TableError::Empty { .. })));
    }

    #[test]
    fn full_run_builds_both_comparisons() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, journal) = MockEngine::new(dir.path().to_path_buf());
        let engine = engine
            .with_export("hole1", RAW_CSV)
            .with_export("hole1_composites", COMP_CSV);
        let mut session = EngineSession::connected(Box::new(engine));
        let mut ctx = context(dir.path());

        ctx.prepare(&mut session).unwrap();
        let params = CompositeParameters::new("ZONE", 3, &ctx.columns).unwrap();
        let report = ctx.run_analysis(&mut session, &params, "AU").unwrap();
        session.disconnect();

        assert_eq!(report.output_name, "hole1_composites");
        assert!(journal
            .borrow()
            .commands
            .iter()
            .any(|c| c.contains("*ZONE=ZONE @INTERVAL=3")));
        assert_eq!(journal.borrow().releases, 1);

        let length = &report.length;
        assert_eq!(length.raw.title, "Raw LENGTH Distribution");
        assert_eq!(length.composite.title, "Composite LENGTH Distribution (size: 3m)");
        assert_eq!(length.raw.color, "lightgray");

        for metric in Metric::ALL {
            let row = length.table.row(metric).unwrap();
            assert_eq!(row.raw, round_to(length.raw.stats.get(metric), 4), "{metric}");
        }

        let mean = length.table.row(Metric::Mean).unwrap();
        assert_eq!((mean.raw, mean.composite, mean.difference_pct), (2.5, 3.0, 20.0));

        assert_eq!(report.grade.column, "AU");
        assert_eq!(report.grade.raw.color, "goldenrod");
        assert_eq!(report.grade.table.row(Metric::Count).unwrap().composite, 3.0);
    }

    #[test]
    fn run_before_prepare_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _journal) = MockEngine::new(dir.path().to_path_buf());
        let mut session = EngineSession::connected(Box::new(engine));
        let mut ctx = context(dir.path());
        let params = CompositeParameters::new("ZONE", 3, &columns()).unwrap();

        assert!(matches!(
            ctx.run_analysis(&mut session, &params, "AU"),
            Err(PipelineError::NotPrepared)
        ));
    }

    #[test]
    fn missing_grade_column_in_composites_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _journal) = MockEngine::new(dir.path().to_path_buf());
        let engine = engine
            .with_export("hole1", RAW_CSV)
            .with_export("hole1_composites", "BHID,LENGTH\nDH1,3\n");
        let mut session = EngineSession::connected(Box::new(engine));
        let mut ctx = context(dir.path());

        ctx.prepare(&mut session).unwrap();
        let params = CompositeParameters::new("ZONE", 3, &ctx.columns).unwrap();
        let err = ctx.run_analysis(&mut session, &params, "AU").unwrap_err();
        assert!(matches!(err, PipelineError::Table(TableError::MissingColumn { .. })));
    }
}
