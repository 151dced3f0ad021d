use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of derivative contract handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    Future,
    Call,
    Put,
}

impl InstrumentKind {
    #[must_use]
    pub const fn is_option(self) -> bool {
        matches!(self, Self::Call | Self::Put)
    }

    /// Short display code used in output rows ("Futures", "Call", "Put").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Future => "Futures",
            Self::Call => "Call",
            Self::Put => "Put",
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved instrument, keyed across the system by its canonical
/// Bloomberg-style ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Canonical ticker produced by the instrument resolver.
    pub ticker: String,
    /// Raw exchange symbol the ticker was generated from.
    pub symbol: String,
    pub kind: InstrumentKind,
    pub expiry: NaiveDate,
    /// Strike price; always zero for futures.
    pub strike: Decimal,
    /// Contract multiplier (units per lot).
    pub lot_size: u32,
    /// Grouping key for all contracts on the same underlying.
    pub underlying: String,
}

impl Instrument {
    /// Builds an instrument, forcing the strike to zero for futures.
    #[must_use]
    pub fn new(
        ticker: String,
        symbol: String,
        kind: InstrumentKind,
        expiry: NaiveDate,
        strike: Decimal,
        lot_size: u32,
        underlying: String,
    ) -> Self {
        let strike = if kind == InstrumentKind::Future {
            Decimal::ZERO
        } else {
            strike
        };
        Self {
            ticker,
            symbol,
            kind,
            expiry,
            strike,
            lot_size,
            underlying,
        }
    }
}
