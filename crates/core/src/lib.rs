pub mod config;
pub mod config_loader;
pub mod engine;
pub mod instrument;
pub mod ledger;
pub mod record;
pub mod strategy;
pub mod summary;
pub mod trade;

pub use config::{AppConfig, InputConfig, OutputConfig};
pub use config_loader::ConfigLoader;
pub use engine::TradeEngine;
pub use instrument::{Instrument, InstrumentKind};
pub use ledger::{BookSummary, LedgerEntry, OpeningPosition, PositionLedger};
pub use record::ProcessedTradeRecord;
pub use strategy::StrategyLabel;
pub use summary::{RunSummary, SummaryFormatter};
pub use trade::{CostAttrs, Trade};
