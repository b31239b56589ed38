//! Retarget CLI
//!
//! - `retarget [--project DIR] [--config FILE]`: full run
//! - `retarget --dry-run`: classification and copy pass only
//! - `retarget init`: write a default `retarget.toml`
//!
//! Logs go to stderr, the report to stdout. Exit code 0 on success
//! (warnings included), 1 on any fatal error. A failed run leaves the
//! output tree as far as it got.

mod commands;
mod format;

use std::path::{Path, PathBuf};
use std::process;

use retarget_core::Result;
use retarget_engine::{RetargetConfig, Retargeter, CONFIG_FILE_NAME};
use retarget_host::ProjectHost;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_report, format_summary, OutputMode};

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let exit_code = match run(&matches, mode) {
        Ok(()) => {
            info!("Complete.");
            0
        }
        Err(e) => {
            error!(error = %e, "Failed.");
            eprintln!("{}", format_error(&e, mode));
            1
        }
    };
    process::exit(exit_code);
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(matches: &clap::ArgMatches, mode: OutputMode) -> Result<()> {
    let project_dir = matches
        .get_one::<String>("project")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);

    if matches.subcommand_name() == Some("init") {
        return run_init(&project_dir, config_path.as_deref());
    }

    let config = RetargetConfig::load(&project_dir, config_path.as_deref())?;
    let paths = config.resolve(&project_dir)?;
    let host = ProjectHost::new(&paths.assets_dir, &paths.build_dir);
    let retargeter = Retargeter::new(&config, &project_dir, &host, &host, &host)?;

    if matches.get_flag("dry-run") {
        let summary = retargeter.run_dry()?;
        println!("{}", format_summary(&summary, mode));
    } else {
        let report = retargeter.run()?;
        println!("{}", format_report(&report, mode));
    }
    Ok(())
}

fn run_init(project_dir: &Path, explicit: Option<&Path>) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_dir.join(CONFIG_FILE_NAME));
    if RetargetConfig::write_default_if_missing(&path)? {
        info!(path = %path.display(), "wrote default config");
    } else {
        info!(path = %path.display(), "config already exists, left unchanged");
    }
    Ok(())
}
