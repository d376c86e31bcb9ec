use crate::error::{AttendanceError, AttendanceResult};
use chrono::{DateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `reports.log` -> `reports_20240105_093000.log.archive`
pub fn archive_path_for<Tz: TimeZone>(report_path: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stem = report_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reports");
    let extension = report_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("log");
    let file_name = format!(
        "{}_{}.{}.archive",
        stem,
        now.format(ARCHIVE_TIMESTAMP_FORMAT),
        extension
    );

    report_path.with_file_name(file_name)
}

/// Move a previous report out of the way before a new run.
///
/// Returns the archive path, or `None` if there was no report to move. An
/// existing archive with the same name is never overwritten: the call fails
/// and both files stay where they are.
pub fn archive_existing_report<Tz: TimeZone>(
    report_path: &Path,
    now: &DateTime<Tz>,
) -> AttendanceResult<Option<PathBuf>>
where
    Tz::Offset: std::fmt::Display,
{
    if !report_path.exists() {
        debug!("No previous report at {}", report_path.display());
        return Ok(None);
    }

    let archive_path = archive_path_for(report_path, now);
    if archive_path.exists() {
        return Err(AttendanceError::filesystem(format!(
            "Archive target {} already exists; refusing to overwrite it with {}",
            archive_path.display(),
            report_path.display()
        )));
    }

    fs::rename(report_path, &archive_path)
        .map_err(|e| AttendanceError::io("archive report", report_path, e))?;

    info!(
        "Archived previous report to {}",
        archive_path.display()
    );
    Ok(Some(archive_path))
}
