pub mod archiver;
pub mod error;
pub mod models;
pub mod processor;
pub mod runner;

pub use error::{AttendanceError, AttendanceResult};
pub use models::{Config, RunMode, Thresholds};
pub use processor::{AlertLevel, AttendanceProcessor, RunSummary};
pub use runner::{run_attendance_check, RunPaths};
