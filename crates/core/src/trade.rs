use crate::instrument::Instrument;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional cost attributes attached to broker-reconciled trades.
///
/// Presence is tagged per field: a trade either carries a commission
/// figure or it does not, and the pro-ration logic branches on that
/// explicitly rather than treating missing data as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAttrs {
    /// Pure brokerage amount for this trade.
    pub commission: Option<Decimal>,
    /// Total taxes for this trade.
    pub taxes: Option<Decimal>,
    /// Trade date string from the broker file, carried through verbatim.
    pub trade_date: Option<String>,
}

impl CostAttrs {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commission.is_none() && self.taxes.is_none() && self.trade_date.is_none()
    }
}

/// A single resolved trade execution, the immutable input unit of the
/// application engine.
///
/// `lots` is signed: positive for buys, negative for sells. The engine
/// assumes it is non-zero; zero-lot rows are filtered by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub instrument: Instrument,
    /// Signed lot quantity (buy > 0, sell < 0). Never zero.
    pub lots: Decimal,
    pub costs: CostAttrs,
}

impl Trade {
    #[must_use]
    pub fn new(instrument: Instrument, lots: Decimal) -> Self {
        Self {
            instrument,
            lots,
            costs: CostAttrs::default(),
        }
    }

    #[must_use]
    pub fn with_costs(instrument: Instrument, lots: Decimal, costs: CostAttrs) -> Self {
        Self {
            instrument,
            lots,
            costs,
        }
    }

    /// Signed absolute quantity: lots times the contract multiplier.
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.lots * Decimal::from(self.instrument.lot_size)
    }

    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.instrument.ticker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::InstrumentKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_instrument(lot_size: u32) -> Instrument {
        Instrument::new(
            "ACC=U5 IS Equity".to_string(),
            "ACC".to_string(),
            InstrumentKind::Future,
            NaiveDate::from_ymd_opt(2025, 9, 25).unwrap(),
            Decimal::ZERO,
            lot_size,
            "ACC".to_string(),
        )
    }

    #[test]
    fn quantity_is_lots_times_lot_size() {
        let trade = Trade::new(sample_instrument(300), dec!(-4));
        assert_eq!(trade.quantity(), dec!(-1200));
    }

    #[test]
    fn default_costs_are_empty() {
        let trade = Trade::new(sample_instrument(1), dec!(1));
        assert!(trade.costs.is_empty());
    }

    #[test]
    fn tagged_presence_survives_partial_costs() {
        let costs = CostAttrs {
            commission: Some(dec!(12.50)),
            taxes: None,
            trade_date: Some("2025-08-14".to_string()),
        };
        let trade = Trade::with_costs(sample_instrument(1), dec!(2), costs);
        assert!(!trade.costs.is_empty());
        assert_eq!(trade.costs.commission, Some(dec!(12.50)));
        assert_eq!(trade.costs.taxes, None);
    }
}
