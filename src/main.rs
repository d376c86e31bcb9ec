use anyhow::Result;
use attendance_checker::{run_attendance_check, RunPaths};
use clap::{Arg, ArgAction, Command};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .init();
}

fn main() -> Result<()> {
    let matches = Command::new("attendance-checker")
        .version("0.1")
        .about("Warns students whose attendance is below the configured thresholds")
        .arg(
            Arg::new("base-dir")
                .short('b')
                .long("base-dir")
                .value_name("DIR")
                .help("Directory holding Helpers/ and reports/")
                .default_value("."),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (default: <base-dir>/Helpers/config.json)"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Attendance table (default: <base-dir>/Helpers/assets.csv)"),
        )
        .arg(
            Arg::new("reports-dir")
                .short('r')
                .long("reports-dir")
                .value_name("DIR")
                .help("Report directory (default: <base-dir>/reports)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .get_matches();

    init_tracing(matches.get_count("verbose"));

    let base_dir = matches
        .get_one::<String>("base-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut paths = RunPaths::from_base_dir(&base_dir);
    if let Some(config) = matches.get_one::<String>("config") {
        paths.config_path = PathBuf::from(config);
    }
    if let Some(input) = matches.get_one::<String>("input") {
        paths.input_path = PathBuf::from(input);
    }
    if let Some(reports_dir) = matches.get_one::<String>("reports-dir") {
        paths.reports_dir = PathBuf::from(reports_dir);
    }
    debug!("Resolved run paths: {:?}", paths);

    let stdout = io::stdout();
    let mut console = stdout.lock();
    let summary = run_attendance_check(&paths, &mut console)?;

    info!(
        "Attendance check complete: {} students, {} alerts",
        summary.students_processed,
        summary.alerts()
    );
    Ok(())
}
