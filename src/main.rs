//! paircheck - Batch driver for pairwise conflict analysis of automation apps
//!
//! Orchestrates an external model checker over app pairs: enumerates the
//! pairs from one or two identifier lists, stages each pair for the
//! extractor toolchain, renders the checker's run profile for the requested
//! mode, invokes the checker, and classifies the outcome from its log.
//!
//! # Execution Flow
//!
//! 1. Initialize logging -> logs/paircheck_<date>.log + console
//! 2. Load toolchain settings (paircheck.yaml, optional)
//! 3. Phase 1: extract app pairs from the app lists
//! 4. Phase 2: run the checker per pair, one at a time, appending a line
//!    per pair to `<log dir>/logList`
//!
//! The build and compile steps run in the current working directory, which
//! is expected to be the toolchain's infrastructure directory (the one
//! holding the Makefile and the staging slots).

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use paircheck::services::BatchRunner;
use paircheck::{APP_NAME, AppList, ConfigManager, RunConfiguration, VERSION, enumerate_pairs};

#[derive(Parser)]
#[command(name = "paircheck")]
#[command(about = "Drive pairwise conflict analysis of automation apps through a model checker")]
#[command(version)]
struct Cli {
    /// Model-checker installation directory
    checker_dir: Utf8PathBuf,

    /// Output directory for per-pair logs and the logList summary
    log_dir: Utf8PathBuf,

    /// Base directory containing the app artifacts named by the lists
    app_dir: Utf8PathBuf,

    /// Partial-order reduction: "true" enables it, any other value disables
    reduction: String,

    /// Conflict detection: "false" disables the conflict listener, any
    /// other value leaves it enabled
    conflict_detection: String,

    /// Path to the first app list (one identifier per line, `#` comments)
    first_list: Utf8PathBuf,

    /// Optional second app list, enabling cross-list pairing
    second_list: Option<Utf8PathBuf>,

    /// Path to the toolchain settings file
    #[arg(long, default_value = "paircheck.yaml")]
    settings: Utf8PathBuf,

    /// Enable debug-level logging
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = paircheck::logging::setup_logging("logs", "paircheck", cli.debug)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // Single-threaded runtime: pairs are processed strictly one at a time,
    // the only async work is waiting on external processes.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let config_manager = ConfigManager::with_path(&cli.settings);
    let toolchain = config_manager.load_toolchain_config()?.toolchain;

    let run_config = RunConfiguration::from_cli_flags(
        &cli.reduction,
        &cli.conflict_detection,
        toolchain.timeout_minutes,
    );
    tracing::info!(
        "Run mode: reduction={}, conflict_detection={}, timeout={}m",
        run_config.reduction,
        run_config.conflict_detection,
        run_config.timeout_minutes
    );

    tracing::info!("PHASE 1: Extracting the app pairs from the app lists");
    let first_list = AppList::from_file(&cli.first_list)?;
    let second_list = cli
        .second_list
        .as_ref()
        .map(AppList::from_file)
        .transpose()?;
    let pairs = enumerate_pairs(&first_list, second_list.as_ref());
    tracing::info!("Enumerated {} app pairs", pairs.len());

    let work_dir = Utf8PathBuf::from(".");
    let runner = BatchRunner::new(
        &cli.checker_dir,
        &cli.log_dir,
        &cli.app_dir,
        &work_dir,
        &toolchain,
        run_config,
    )?;

    tracing::info!("PHASE 2: Running the model checker");
    let records = runtime.block_on(runner.run(&pairs))?;

    tracing::info!(
        "Batch complete: {} pairs recorded in {}",
        records.len(),
        cli.log_dir.join("logList")
    );
    Ok(())
}
