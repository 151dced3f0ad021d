use clap::{Parser, Subcommand};

mod commands;

use commands::{ProcessArgs, SnapshotArgs};

#[derive(Parser)]
#[command(name = "trade-recon")]
#[command(about = "Position reconciliation and strategy assignment for derivatives books", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a trade file to an opening book and write processed trades
    /// plus the final position snapshot
    Process(ProcessArgs),
    /// Load the opening book only and write its snapshot (sanity check)
    Snapshot(SnapshotArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Process(args) => commands::run_process(args),
        Commands::Snapshot(args) => commands::run_snapshot(args),
    }
}
