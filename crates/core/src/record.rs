use crate::strategy::StrategyLabel;
use crate::trade::CostAttrs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One emitted leg of a processed trade: the permanent audit record of
/// how a raw trade was classified and, when necessary, split.
///
/// Records are write-once. A non-split trade emits exactly one; a split
/// trade emits a close leg followed by an open leg, both carrying the
/// same `source_index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedTradeRecord {
    /// Zero-based position of the originating trade in the input
    /// sequence.
    pub source_index: usize,
    pub ticker: String,
    /// Label stamped on this leg at application time.
    pub strategy: StrategyLabel,
    /// Unsigned lot count for this leg.
    pub lots: Decimal,
    /// Signed lot carrier (sign follows the originating trade).
    pub signed_lots: Decimal,
    /// Signed absolute quantity: `signed_lots` times lot size.
    pub signed_quantity: Decimal,
    pub lot_size: u32,
    /// True when this leg came from splitting a zero-crossing trade.
    pub is_split: bool,
    /// Data-quality flag: this leg's direction conflicts with the label
    /// it was stamped with. Surfaced to the audit trail, never an error.
    pub is_opposite: bool,
    /// Cost attributes for this leg; pro-rated when the parent trade
    /// was split.
    pub costs: CostAttrs,
}

impl ProcessedTradeRecord {
    /// "Yes"/"No" rendering used by the clearing-file sink.
    #[must_use]
    pub const fn split_flag(&self) -> &'static str {
        if self.is_split {
            "Yes"
        } else {
            "No"
        }
    }

    #[must_use]
    pub const fn opposite_flag(&self) -> &'static str {
        if self.is_opposite {
            "Yes"
        } else {
            "No"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn flags_render_as_yes_no() {
        let record = ProcessedTradeRecord {
            source_index: 0,
            ticker: "T".to_string(),
            strategy: StrategyLabel::LongExposure,
            lots: dec!(5),
            signed_lots: dec!(-5),
            signed_quantity: dec!(-50),
            lot_size: 10,
            is_split: true,
            is_opposite: false,
            costs: CostAttrs::default(),
        };
        assert_eq!(record.split_flag(), "Yes");
        assert_eq!(record.opposite_flag(), "No");
    }
}
