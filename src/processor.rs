use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{AttendanceRecord, AttendanceRow, Config, RunMode, Thresholds};
use chrono::Local;
use std::io::{Read, Write};
use tracing::{debug, info};

pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    None,
    Warning,
    Failure,
}

/// Failure is checked first, so a student below both thresholds only gets the
/// failure notice. Comparisons are strict: sitting on a threshold is fine.
pub fn classify(attendance_pct: f64, thresholds: &Thresholds) -> AlertLevel {
    if attendance_pct < thresholds.failure {
        AlertLevel::Failure
    } else if attendance_pct < thresholds.warning {
        AlertLevel::Warning
    } else {
        AlertLevel::None
    }
}

pub fn alert_message(level: AlertLevel, name: &str, attendance_pct: f64) -> Option<String> {
    match level {
        AlertLevel::Failure => Some(format!(
            "URGENT: {}, your attendance is {:.1}%. You will fail this class.",
            name, attendance_pct
        )),
        AlertLevel::Warning => Some(format!(
            "WARNING: {}, your attendance is {:.1}%. Please be careful.",
            name, attendance_pct
        )),
        AlertLevel::None => None,
    }
}

fn timestamp() -> String {
    Local::now().format(REPORT_TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run_mode: RunMode,
    pub students_processed: usize,
    pub warnings: usize,
    pub failures: usize,
}

impl RunSummary {
    pub fn alerts(&self) -> usize {
        self.warnings + self.failures
    }
}

pub struct AttendanceProcessor<'a> {
    pub config: &'a Config,
}

impl<'a> AttendanceProcessor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Single pass over the input table.
    ///
    /// The header line always goes to `report`. Alert lines go to `report` only
    /// in live mode; `console` gets one line per alert in either mode. The first
    /// bad row aborts the pass, leaving earlier lines in place.
    pub fn process<R, L, C>(
        &self,
        input: R,
        report: &mut L,
        console: &mut C,
    ) -> AttendanceResult<RunSummary>
    where
        R: Read,
        L: Write,
        C: Write,
    {
        if self.config.total_sessions == 0 {
            return Err(AttendanceError::Config(
                "total_sessions is zero; attendance percentage is undefined".to_string(),
            ));
        }

        writeln!(report, "--- Attendance Report Run: {} ---", timestamp())
            .map_err(|e| AttendanceError::Filesystem {
                message: format!("Failed to write report header: {}", e),
                source: Some(e),
            })?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(input);
        let headers = reader
            .headers()
            .map_err(|e| AttendanceError::data(1, e))?
            .clone();

        let mut summary = RunSummary {
            run_mode: self.config.run_mode.clone(),
            students_processed: 0,
            warnings: 0,
            failures: 0,
        };

        for result in reader.records() {
            let record = result.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                AttendanceError::data(line, e)
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let row: AttendanceRow = record
                .deserialize(Some(&headers))
                .map_err(|e| AttendanceError::data(line, e))?;
            let student = row.parse().map_err(|e| AttendanceError::data(line, e))?;

            summary.students_processed += 1;
            match self.handle_student(&student, report, console)? {
                AlertLevel::Failure => summary.failures += 1,
                AlertLevel::Warning => summary.warnings += 1,
                AlertLevel::None => {}
            }
        }

        report.flush().map_err(|e| AttendanceError::Filesystem {
            message: format!("Failed to flush report: {}", e),
            source: Some(e),
        })?;

        info!(
            "Processed {} students ({} warnings, {} failures, mode: {})",
            summary.students_processed, summary.warnings, summary.failures, summary.run_mode
        );
        Ok(summary)
    }

    fn handle_student<L: Write, C: Write>(
        &self,
        student: &AttendanceRecord,
        report: &mut L,
        console: &mut C,
    ) -> AttendanceResult<AlertLevel> {
        let attendance_pct = student.attendance_pct(self.config.total_sessions);
        let level = classify(attendance_pct, &self.config.thresholds);
        debug!(
            "{}: {:.1}% -> {:?}",
            student.name, attendance_pct, level
        );

        let Some(message) = alert_message(level, &student.name, attendance_pct) else {
            return Ok(level);
        };

        let echoed = if self.config.run_mode.is_live() {
            writeln!(
                report,
                "[{}] ALERT SENT TO {}: {}",
                timestamp(),
                student.email,
                message
            )
            .map_err(|e| AttendanceError::Filesystem {
                message: format!("Failed to write alert for {}: {}", student.email, e),
                source: Some(e),
            })?;
            writeln!(console, "Logged alert for {}", student.name)
        } else {
            writeln!(console, "[DRY RUN] Email to {}: {}", student.email, message)
        };
        echoed.map_err(|e| AttendanceError::Filesystem {
            message: format!("Failed to write to console: {}", e),
            source: Some(e),
        })?;

        Ok(level)
    }
}
