//! The `snapshot` command: load the opening book, derive labels, and
//! write it straight back out without applying any trades. Useful for
//! checking that a position file resolves and labels the way the
//! `process` run will see it.

use anyhow::Result;
use clap::Args;
use trade_recon_core::{ConfigLoader, PositionLedger};
use trade_recon_data::{load_opening_positions, write_snapshot};

/// Arguments for the snapshot command.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Opening position file (CSV)
    #[arg(long)]
    pub positions: String,

    /// Output file path
    #[arg(short, long, default_value = "opening_snapshot.csv")]
    pub output: String,

    /// Symbol mapping file (overrides the configured one)
    #[arg(long)]
    pub mapping: Option<String>,
}

/// Runs the snapshot command.
///
/// # Errors
/// Returns an error if the position file cannot be loaded or the
/// snapshot cannot be written.
pub fn run_snapshot(args: SnapshotArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let resolver = super::build_resolver(args.mapping.as_deref(), &config)?;

    let positions = load_opening_positions(&args.positions, &resolver)?;
    let ledger = PositionLedger::seeded(positions);
    let snapshot = ledger.snapshot();

    write_snapshot(&args.output, &snapshot)?;

    println!("Opening book: {} positions", snapshot.len());
    for entry in &snapshot {
        println!(
            "  {:<40} {:>8} lots  {}  {}",
            entry.ticker(),
            entry.lots,
            entry.strategy,
            entry.direction()
        );
    }

    Ok(())
}
