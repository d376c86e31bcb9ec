use crate::error::{AttendanceError, AttendanceResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub total_sessions: u32,
    pub run_mode: RunMode,
    pub thresholds: Thresholds,
}

/// Percentages below which a student is warned or told they will fail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub failure: f64,
    pub warning: f64,
}

/// `"live"` records alerts in the report. Any other value is a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunMode {
    Live,
    Dry(String),
}

impl RunMode {
    pub fn is_live(&self) -> bool {
        matches!(self, RunMode::Live)
    }
}

impl From<String> for RunMode {
    fn from(value: String) -> Self {
        if value == "live" {
            RunMode::Live
        } else {
            RunMode::Dry(value)
        }
    }
}

impl From<RunMode> for String {
    fn from(mode: RunMode) -> Self {
        match mode {
            RunMode::Live => "live".to_string(),
            RunMode::Dry(value) => value,
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Live => write!(f, "live"),
            RunMode::Dry(value) => write!(f, "dry ({:?})", value),
        }
    }
}

fn is_toml(file_path: &Path) -> bool {
    file_path.extension().and_then(|s| s.to_str()) == Some("toml")
}

impl Config {
    /// Load and validate a config document. `.toml` files are read as TOML,
    /// everything else as JSON.
    pub fn load_from_file(file_path: impl AsRef<Path>) -> AttendanceResult<Self> {
        let file_path = file_path.as_ref();
        let content = std::fs::read_to_string(file_path).map_err(|e| {
            AttendanceError::Config(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let config: Config = if is_toml(file_path) {
            toml::from_str(&content).map_err(|e| {
                AttendanceError::Config(format!("Invalid config {}: {}", file_path.display(), e))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                AttendanceError::Config(format!("Invalid config {}: {}", file_path.display(), e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: impl AsRef<Path>) -> AttendanceResult<()> {
        let file_path = file_path.as_ref();
        let content = if is_toml(file_path) {
            toml::to_string_pretty(self).map_err(AttendanceError::config)?
        } else {
            serde_json::to_string_pretty(self).map_err(AttendanceError::config)?
        };
        std::fs::write(file_path, content)
            .map_err(|e| AttendanceError::io("write config", file_path, e))?;
        Ok(())
    }

    pub fn validate(&self) -> AttendanceResult<()> {
        if self.total_sessions == 0 {
            return Err(AttendanceError::Config(
                "total_sessions must be greater than zero".to_string(),
            ));
        }

        let Thresholds { failure, warning } = self.thresholds;
        if !failure.is_finite() || !warning.is_finite() {
            return Err(AttendanceError::Config(format!(
                "thresholds must be finite numbers (failure: {}, warning: {})",
                failure, warning
            )));
        }

        // Failure is checked first, so a higher failure threshold would hide every warning.
        if failure > warning {
            return Err(AttendanceError::Config(format!(
                "failure threshold ({}) must not exceed warning threshold ({})",
                failure, warning
            )));
        }

        Ok(())
    }
}

/// One row of the input table, as text. Extra columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRow {
    #[serde(rename = "Names")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Attendance Count")]
    pub attendance_count: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub name: String,
    pub email: String,
    pub attended_sessions: i64,
}

impl AttendanceRow {
    pub fn parse(self) -> Result<AttendanceRecord, String> {
        let attended_sessions = self
            .attendance_count
            .trim()
            .parse::<i64>()
            .map_err(|e| {
                format!(
                    "invalid Attendance Count {:?} for {}: {}",
                    self.attendance_count, self.name, e
                )
            })?;

        Ok(AttendanceRecord {
            name: self.name,
            email: self.email,
            attended_sessions,
        })
    }
}

impl AttendanceRecord {
    /// Percentage of sessions attended. Not clamped.
    pub fn attendance_pct(&self, total_sessions: u32) -> f64 {
        self.attended_sessions as f64 / total_sessions as f64 * 100.0
    }
}
