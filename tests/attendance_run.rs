use attendance_checker::{run_attendance_check, AttendanceError, RunPaths};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const LIVE_CONFIG: &str =
    r#"{"total_sessions": 10, "thresholds": {"failure": 50, "warning": 75}, "run_mode": "live"}"#;
const DRY_CONFIG: &str =
    r#"{"total_sessions": 10, "thresholds": {"failure": 50, "warning": 75}, "run_mode": "dry"}"#;

fn setup(base: &Path, config: &str, table: &str) -> RunPaths {
    let paths = RunPaths::from_base_dir(base);
    fs::create_dir_all(base.join("Helpers")).unwrap();
    fs::write(&paths.config_path, config).unwrap();
    fs::write(&paths.input_path, table).unwrap();
    paths
}

fn archives(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".log.archive"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_live_run_end_to_end() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = setup(
        temp_dir.path(),
        LIVE_CONFIG,
        "Names,Email,Attendance Count\nJane Doe,jane@x.com,4\nRick,rick@x.com,8\n",
    );

    let mut console = Vec::new();
    let summary = run_attendance_check(&paths, &mut console)?;
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.warnings, 0);

    let report = fs::read_to_string(paths.report_path())?;
    assert!(report.contains(
        "ALERT SENT TO jane@x.com: URGENT: Jane Doe, your attendance is 40.0%. You will fail this class."
    ));
    assert!(!report.contains("rick@x.com"));
    assert_eq!(String::from_utf8(console)?, "Logged alert for Jane Doe\n");
    Ok(())
}

#[test]
fn test_dry_run_report_holds_only_header() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = setup(
        temp_dir.path(),
        DRY_CONFIG,
        "Names,Email,Attendance Count\nA,a@x.com,1\nB,b@x.com,6\nC,c@x.com,2\n",
    );

    let mut console = Vec::new();
    run_attendance_check(&paths, &mut console)?;

    let report = fs::read_to_string(paths.report_path())?;
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("--- Attendance Report Run: "));

    let console = String::from_utf8(console)?;
    let order: Vec<&str> = console
        .lines()
        .map(|line| line.split(':').next().unwrap())
        .collect();
    assert_eq!(
        order,
        [
            "[DRY RUN] Email to a@x.com",
            "[DRY RUN] Email to b@x.com",
            "[DRY RUN] Email to c@x.com"
        ]
    );
    Ok(())
}

#[test]
fn test_second_run_archives_first_report() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = setup(
        temp_dir.path(),
        LIVE_CONFIG,
        "Names,Email,Attendance Count\nJane Doe,jane@x.com,4\n",
    );

    run_attendance_check(&paths, &mut Vec::new())?;
    let first_report = fs::read_to_string(paths.report_path())?;
    run_attendance_check(&paths, &mut Vec::new())?;

    let archived = archives(&paths.reports_dir);
    assert_eq!(archived.len(), 1);
    assert!(archived[0].starts_with("reports_"));
    assert_eq!(
        fs::read_to_string(paths.reports_dir.join(&archived[0]))?,
        first_report
    );
    assert!(paths.report_path().exists());
    Ok(())
}

#[test]
fn test_missing_input_is_filesystem_error() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = setup(temp_dir.path(), LIVE_CONFIG, "");
    fs::remove_file(&paths.input_path)?;

    let err = run_attendance_check(&paths, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, AttendanceError::Filesystem { .. }));
    Ok(())
}

#[test]
fn test_inverted_thresholds_fail_before_touching_reports() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let paths = setup(
        temp_dir.path(),
        r#"{"total_sessions": 10, "thresholds": {"failure": 80, "warning": 60}, "run_mode": "live"}"#,
        "Names,Email,Attendance Count\nA,a@x.com,7\n",
    );

    let err = run_attendance_check(&paths, &mut Vec::new()).unwrap_err();
    assert!(err.is_config());
    assert!(!paths.reports_dir.exists());
    Ok(())
}

#[test]
fn test_binary_succeeds_with_base_dir() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    setup(
        temp_dir.path(),
        DRY_CONFIG,
        "Names,Email,Attendance Count\nJane Doe,jane@x.com,4\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_attendance-checker"))
        .args(["--base-dir", temp_dir.path().to_str().unwrap()])
        .output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout,
        "[DRY RUN] Email to jane@x.com: URGENT: Jane Doe, your attendance is 40.0%. You will fail this class.\n"
    );
    Ok(())
}

#[test]
fn test_binary_exits_non_zero_without_config() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let output = Command::new(env!("CARGO_BIN_EXE_attendance-checker"))
        .current_dir(temp_dir.path())
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"), "stderr: {}", stderr);
    Ok(())
}
