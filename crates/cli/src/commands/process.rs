//! The `process` command: the run orchestrator.
//!
//! Seeds the ledger from the opening book, feeds trades to the engine
//! strictly in file order, writes both output sinks, and prints the
//! run summary.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use trade_recon_core::{
    ConfigLoader, PositionLedger, RunSummary, SummaryFormatter, TradeEngine,
};
use trade_recon_data::{
    load_opening_positions, load_trades, write_processed_trades, write_snapshot,
};

/// Arguments for the process command.
#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    /// Trade file (CSV), applied in file order
    #[arg(long)]
    pub trades: String,

    /// Opening position file (CSV); omit to start from a flat book
    #[arg(long)]
    pub positions: Option<String>,

    /// Symbol mapping file (overrides the configured one)
    #[arg(long)]
    pub mapping: Option<String>,

    /// Output directory (overrides the configured one)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Config profile (merges config/Config.<profile>.toml)
    #[arg(long)]
    pub profile: Option<String>,
}

/// Runs the process command.
///
/// # Errors
/// Returns an error if inputs cannot be loaded or outputs cannot be
/// written.
pub fn run_process(args: ProcessArgs) -> Result<()> {
    let config = match &args.profile {
        Some(profile) => ConfigLoader::load_with_profile(profile)?,
        None => ConfigLoader::load()?,
    };
    let resolver = super::build_resolver(args.mapping.as_deref(), &config)?;

    let ledger = match &args.positions {
        Some(path) => {
            let positions = load_opening_positions(path, &resolver)?;
            PositionLedger::seeded(positions)
        }
        None => {
            tracing::info!("no opening positions supplied, starting from a flat book");
            PositionLedger::new()
        }
    };
    let opening_count = ledger.len();

    let trades = load_trades(&args.trades, &resolver)?;
    tracing::info!(
        trades = trades.len(),
        opening_positions = opening_count,
        "starting reconciliation run"
    );

    let mut engine = TradeEngine::new(ledger);
    let records = engine.run(&trades);

    let output_dir = PathBuf::from(
        args.output_dir
            .as_deref()
            .unwrap_or(&config.output.directory),
    );
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let trades_path = output_dir.join(&config.output.processed_trades_file);
    let snapshot_path = output_dir.join(&config.output.snapshot_file);
    write_processed_trades(&trades_path, &records)?;
    write_snapshot(&snapshot_path, &engine.ledger().snapshot())?;

    let summary = RunSummary::from_run(trades.len(), &records, engine.ledger());
    println!("{}", SummaryFormatter::format(&summary));
    println!("Processed trades: {}", trades_path.display());
    println!("Final positions:  {}", snapshot_path.display());

    Ok(())
}
