use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use benten::backup::BackupOrchestrator;
use benten::cli::Args;
use benten::cloud::HttpTransport;
use benten::config::{ClientConfig, Credentials};
use benten::security::scrub_credentials;
use benten::utils::summary;

fn main() {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = initialize_logging(args.verbose) {
        eprintln!("{:#}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("{}", scrub_credentials(&format!("{:#}", e)));
        process::exit(1);
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Load credentials, run the backup and report the outcome
fn run(args: &Args) -> Result<()> {
    let credentials = Credentials::from_env_file(args.env_file.as_deref())
        .context("Failed to load B2 credentials")?;

    let config = ClientConfig::default();
    let transport = HttpTransport::shared(&config).context("Failed to create HTTP client")?;
    let orchestrator =
        BackupOrchestrator::new(transport, credentials, &config, args.backup_options());

    info!("Starting backup of {} to '{}'", args.src.display(), args.dist);

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = runtime
        .block_on(orchestrator.backup(&args.src, &args.dist))
        .context("Backup failed")?;

    if let Some(path) = &args.summary {
        match summary::write_summary(&report, path) {
            Ok(()) => info!("Summary written to {}", path.display()),
            Err(e) => warn!("Failed to write summary: {}", e),
        }
    }

    info!(
        "Uploaded {} of {} files in {:.1}s",
        report.uploaded_count(),
        report.results.len(),
        (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0
    );

    if let Some(first) = report.first_error() {
        bail!(
            "{} files failed, {} skipped; first error: {}",
            report.failed_count(),
            report.skipped_count(),
            first
        );
    }

    Ok(())
}
