//! Ingestion and output plumbing around the reconciliation core.
//!
//! This crate provides:
//! - The instrument resolver (symbol to canonical Bloomberg-style ticker)
//! - CSV loaders for opening positions and trade files
//! - CSV sinks for processed-trade legs and ledger snapshots

pub mod loader;
pub mod resolver;
pub mod sink;

pub use loader::{load_opening_positions, load_trades, LoadError};
pub use resolver::InstrumentResolver;
pub use sink::{write_processed_trades, write_snapshot};
