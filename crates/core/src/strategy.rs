//! Directional strategy labels and the rules for assigning them.
//!
//! Labels classify a position's market exposure for clearing reports.
//! Puts invert the mapping: a bought put carries short exposure, so a
//! positive put trade is labelled `ShortExposure`.

use crate::instrument::InstrumentKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Directional classification stamped on every ledger entry and
/// processed-trade leg. Serialized as the clearing codes FULO/FUSH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyLabel {
    /// Long market exposure (code FULO).
    #[serde(rename = "FULO")]
    LongExposure,
    /// Short market exposure (code FUSH).
    #[serde(rename = "FUSH")]
    ShortExposure,
}

impl StrategyLabel {
    /// Derives the label for a freshly opened position from the trade's
    /// own sign and instrument kind.
    ///
    /// Futures and calls map buy to `LongExposure`; puts are inverted.
    #[must_use]
    pub fn for_new_position(signed_lots: Decimal, kind: InstrumentKind) -> Self {
        let long = signed_lots > Decimal::ZERO;
        match kind {
            InstrumentKind::Put => {
                if long {
                    Self::ShortExposure
                } else {
                    Self::LongExposure
                }
            }
            InstrumentKind::Future | InstrumentKind::Call => {
                if long {
                    Self::LongExposure
                } else {
                    Self::ShortExposure
                }
            }
        }
    }

    /// Diagnostic: does this label's natural direction disagree with the
    /// given trade sign?
    ///
    /// This is the inverse of [`Self::for_new_position`]. It never blocks
    /// processing; callers record it on the audit trail as a data-quality
    /// signal.
    #[must_use]
    pub fn opposes(self, signed_lots: Decimal, kind: InstrumentKind) -> bool {
        match kind {
            InstrumentKind::Put => match self {
                Self::ShortExposure => signed_lots < Decimal::ZERO,
                Self::LongExposure => signed_lots > Decimal::ZERO,
            },
            InstrumentKind::Future | InstrumentKind::Call => match self {
                Self::LongExposure => signed_lots < Decimal::ZERO,
                Self::ShortExposure => signed_lots > Decimal::ZERO,
            },
        }
    }

    /// Clearing code for output rows.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::LongExposure => "FULO",
            Self::ShortExposure => "FUSH",
        }
    }
}

impl std::fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
