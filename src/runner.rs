use crate::archiver::archive_existing_report;
use crate::error::{AttendanceError, AttendanceResult};
use crate::models::Config;
use crate::processor::{AttendanceProcessor, RunSummary};
use chrono::Local;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const HELPERS_DIR: &str = "Helpers";
pub const REPORTS_DIR: &str = "reports";
pub const CONFIG_FILE: &str = "config.json";
pub const INPUT_FILE: &str = "assets.csv";
pub const REPORT_FILE: &str = "reports.log";

/// Where a run reads its inputs and writes its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub config_path: PathBuf,
    pub input_path: PathBuf,
    pub reports_dir: PathBuf,
}

impl RunPaths {
    /// `<base>/Helpers/config.json`, `<base>/Helpers/assets.csv`, `<base>/reports/`
    pub fn from_base_dir(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        let helpers_dir = base_dir.join(HELPERS_DIR);
        Self {
            config_path: helpers_dir.join(CONFIG_FILE),
            input_path: helpers_dir.join(INPUT_FILE),
            reports_dir: base_dir.join(REPORTS_DIR),
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.reports_dir.join(REPORT_FILE)
    }
}

/// One full run: load config, archive the old report, process the table.
pub fn run_attendance_check<C: Write>(
    paths: &RunPaths,
    console: &mut C,
) -> AttendanceResult<RunSummary> {
    let config = Config::load_from_file(&paths.config_path)?;
    info!(
        "Loaded configuration from {} ({} sessions, failure < {}%, warning < {}%, mode: {})",
        paths.config_path.display(),
        config.total_sessions,
        config.thresholds.failure,
        config.thresholds.warning,
        config.run_mode
    );

    fs::create_dir_all(&paths.reports_dir)
        .map_err(|e| AttendanceError::io("create reports directory", &paths.reports_dir, e))?;

    let report_path = paths.report_path();
    archive_existing_report(&report_path, &Local::now())?;

    let input = File::open(&paths.input_path)
        .map_err(|e| AttendanceError::io("open input table", &paths.input_path, e))?;
    let report = File::create(&report_path)
        .map_err(|e| AttendanceError::io("create report", &report_path, e))?;

    let mut report = BufWriter::new(report);
    let summary =
        AttendanceProcessor::new(&config).process(BufReader::new(input), &mut report, console)?;

    info!("Report written to {}", report_path.display());
    Ok(summary)
}
