//! In-memory position ledger keyed by canonical ticker.
//!
//! The ledger is a single-owner mutable map: exactly one trade
//! application step mutates it at a time, in file order. Entries are
//! created on first exposure and removed the moment lots net to zero;
//! a zero-lot entry is never stored.

use crate::instrument::{Instrument, InstrumentKind};
use crate::strategy::StrategyLabel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lot totals within this distance of zero are treated as flat and the
/// entry is removed.
const ZERO_EPSILON_LOTS: Decimal = Decimal::from_parts(1, 0, 0, false, 4); // 0.0001

/// A begin-of-day position used to seed the ledger before any trades
/// are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPosition {
    pub instrument: Instrument,
    /// Signed lot total carried in from the opening book. Never zero.
    pub lots: Decimal,
}

/// Counts of live entries by direction, instrument kind, and strategy
/// label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookSummary {
    pub total: usize,
    pub long: usize,
    pub short: usize,
    pub futures: usize,
    pub calls: usize,
    pub puts: usize,
    pub long_exposure: usize,
    pub short_exposure: usize,
}

/// Live state for one canonical ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub instrument: Instrument,
    /// Signed lot total.
    pub lots: Decimal,
    /// Derived absolute quantity: lots times lot size.
    pub quantity: Decimal,
    pub strategy: StrategyLabel,
}

impl LedgerEntry {
    fn new(instrument: Instrument, lots: Decimal, strategy: StrategyLabel) -> Self {
        let quantity = lots * Decimal::from(instrument.lot_size);
        Self {
            instrument,
            lots,
            quantity,
            strategy,
        }
    }

    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.instrument.ticker
    }

    /// "Long" / "Short" direction string for reports.
    #[must_use]
    pub fn direction(&self) -> &'static str {
        if self.lots > Decimal::ZERO {
            "Long"
        } else {
            "Short"
        }
    }
}

/// Ticker-keyed book of live positions. Owns all mutation.
#[derive(Debug, Default)]
pub struct PositionLedger {
    entries: HashMap<String, LedgerEntry>,
}

impl PositionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds the opening book. Each position's label is derived from
    /// its own sign and instrument kind (puts inverted). Zero-lot rows
    /// are skipped.
    #[must_use]
    pub fn seeded(positions: Vec<OpeningPosition>) -> Self {
        let mut ledger = Self::new();
        for pos in positions {
            if pos.lots.abs() < ZERO_EPSILON_LOTS {
                tracing::warn!(ticker = %pos.instrument.ticker, "skipping zero-lot opening position");
                continue;
            }
            let label = StrategyLabel::for_new_position(pos.lots, pos.instrument.kind);
            tracing::info!(
                ticker = %pos.instrument.ticker,
                lots = %pos.lots,
                strategy = %label,
                "seeded opening position"
            );
            ledger.entries.insert(
                pos.instrument.ticker.clone(),
                LedgerEntry::new(pos.instrument, pos.lots, label),
            );
        }
        ledger
    }

    /// Current state for a ticker; absence means flat.
    #[must_use]
    pub fn get(&self, ticker: &str) -> Option<&LedgerEntry> {
        self.entries.get(ticker)
    }

    /// True iff an entry exists and its sign differs from the delta's
    /// sign. A flat or absent book is never opposing.
    #[must_use]
    pub fn is_opposing(&self, ticker: &str, delta_lots: Decimal) -> bool {
        match self.entries.get(ticker) {
            Some(entry) => {
                (entry.lots > Decimal::ZERO && delta_lots < Decimal::ZERO)
                    || (entry.lots < Decimal::ZERO && delta_lots > Decimal::ZERO)
            }
            None => false,
        }
    }

    /// Applies a signed lot delta under the supplied label.
    ///
    /// Creates the entry when absent; otherwise adds the delta,
    /// overwrites the label, and recomputes quantity. An entry whose
    /// resulting lot total is within epsilon of zero is removed.
    pub fn apply_delta(
        &mut self,
        ticker: &str,
        delta_lots: Decimal,
        instrument: &Instrument,
        strategy: StrategyLabel,
    ) {
        match self.entries.get_mut(ticker) {
            None => {
                tracing::info!(
                    ticker = %ticker,
                    lots = %delta_lots,
                    strategy = %strategy,
                    "opened new position"
                );
                self.entries.insert(
                    ticker.to_string(),
                    LedgerEntry::new(instrument.clone(), delta_lots, strategy),
                );
            }
            Some(entry) => {
                let old_lots = entry.lots;
                let new_lots = old_lots + delta_lots;

                if new_lots.abs() < ZERO_EPSILON_LOTS {
                    self.entries.remove(ticker);
                    tracing::info!(ticker = %ticker, "position closed, entry removed");
                } else {
                    entry.lots = new_lots;
                    entry.strategy = strategy;
                    entry.quantity = new_lots * Decimal::from(entry.instrument.lot_size);
                    tracing::info!(
                        ticker = %ticker,
                        old_lots = %old_lots,
                        new_lots = %new_lots,
                        strategy = %strategy,
                        "updated position"
                    );
                }
            }
        }
    }

    /// Stable, ticker-sorted export of all live entries.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        let mut entries: Vec<LedgerEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.instrument.ticker.cmp(&b.instrument.ticker));
        entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summary statistics over the live book.
    #[must_use]
    pub fn summary(&self) -> BookSummary {
        let mut summary = BookSummary {
            total: self.entries.len(),
            ..BookSummary::default()
        };
        for entry in self.entries.values() {
            if entry.lots > Decimal::ZERO {
                summary.long += 1;
            } else {
                summary.short += 1;
            }
            match entry.instrument.kind {
                InstrumentKind::Future => summary.futures += 1,
                InstrumentKind::Call => summary.calls += 1,
                InstrumentKind::Put => summary.puts += 1,
            }
            match entry.strategy {
                StrategyLabel::LongExposure => summary.long_exposure += 1,
                StrategyLabel::ShortExposure => summary.short_exposure += 1,
            }
        }
        summary
    }
}
