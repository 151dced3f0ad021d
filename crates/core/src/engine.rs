//! Sequential trade application engine.
//!
//! Walks an ordered trade list against the position ledger, stamping a
//! strategy label on every resulting leg and splitting any trade whose
//! magnitude crosses the existing position through zero. The engine
//! performs no I/O and raises no business errors; splits and label
//! flips are steady-state behavior recorded on the emitted records.

use crate::instrument::Instrument;
use crate::ledger::{LedgerEntry, PositionLedger};
use crate::record::ProcessedTradeRecord;
use crate::strategy::StrategyLabel;
use crate::trade::{CostAttrs, Trade};
use rust_decimal::{Decimal, RoundingStrategy};

/// Applies trades to the ledger strictly in input order, emitting one
/// or two audit records per trade.
///
/// Order is part of correctness: each decision (new / add / reduce /
/// split) depends on the ledger state left by all prior trades for the
/// same ticker.
pub struct TradeEngine {
    ledger: PositionLedger,
}

impl TradeEngine {
    #[must_use]
    pub fn new(ledger: PositionLedger) -> Self {
        Self { ledger }
    }

    #[must_use]
    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    /// Applies every trade in order and returns the full record
    /// sequence (one or two per input trade, in input order).
    pub fn run(&mut self, trades: &[Trade]) -> Vec<ProcessedTradeRecord> {
        let mut records = Vec::with_capacity(trades.len());
        for (index, trade) in trades.iter().enumerate() {
            records.extend(self.apply(index, trade));
        }
        records
    }

    /// Applies one trade, emitting one record (cases: new position,
    /// add, reduce) or two (split).
    ///
    /// The caller guarantees `trade.lots` is non-zero; zero-lot rows
    /// are filtered upstream.
    pub fn apply(&mut self, source_index: usize, trade: &Trade) -> Vec<ProcessedTradeRecord> {
        let ticker = trade.ticker();
        let kind = trade.instrument.kind;

        let Some(position) = self.ledger.get(ticker) else {
            // New position: label comes from the trade's own sign.
            // `is_opposite` is only meaningful against a pre-existing
            // label, so it is always false here.
            let strategy = StrategyLabel::for_new_position(trade.lots, kind);
            let record = self.emit(source_index, trade, strategy, trade.lots.abs(), false, false, trade.costs.clone());
            self.ledger
                .apply_delta(trade.ticker(), trade.lots, &trade.instrument, strategy);
            return vec![record];
        };

        if !self.ledger.is_opposing(ticker, trade.lots) {
            // Same direction: exposure grows, the existing label is
            // kept rather than recomputed.
            let strategy = position.strategy;
            let is_opposite = strategy.opposes(trade.lots, kind);
            let record = self.emit(source_index, trade, strategy, trade.lots.abs(), false, is_opposite, trade.costs.clone());
            self.ledger
                .apply_delta(ticker, trade.lots, &trade.instrument, strategy);
            return vec![record];
        }

        if trade.lots.abs() <= position.lots.abs() {
            // Reduction that cannot cross zero; the ledger removes the
            // entry itself on an exact close.
            let strategy = position.strategy;
            let is_opposite = strategy.opposes(trade.lots, kind);
            let record = self.emit(source_index, trade, strategy, trade.lots.abs(), false, is_opposite, trade.costs.clone());
            self.ledger
                .apply_delta(ticker, trade.lots, &trade.instrument, strategy);
            return vec![record];
        }

        tracing::info!(
            ticker = %ticker,
            position_lots = %position.lots,
            trade_lots = %trade.lots,
            "trade crosses zero, splitting"
        );
        self.split(source_index, trade, position.clone())
    }

    /// Splits a zero-crossing trade into a close leg against the old
    /// label and an open leg under a freshly derived one. Leg lots and
    /// costs sum exactly to the original trade's totals.
    fn split(
        &mut self,
        source_index: usize,
        trade: &Trade,
        position: LedgerEntry,
    ) -> Vec<ProcessedTradeRecord> {
        let kind = trade.instrument.kind;
        let close_delta = -position.lots;
        let open_delta = trade.lots + position.lots;

        let close_lots = position.lots.abs();
        let open_lots = open_delta.abs();

        let (close_costs, open_costs) =
            split_costs(&trade.costs, close_lots, trade.lots.abs());

        let close_strategy = position.strategy;
        let close_opposite = close_strategy.opposes(trade.lots, kind);
        let close_leg = self.emit(
            source_index,
            trade,
            close_strategy,
            close_lots,
            true,
            close_opposite,
            close_costs,
        );
        tracing::debug!(
            ticker = %trade.ticker(),
            lots = %close_lots,
            strategy = %close_strategy,
            "split close leg"
        );
        // Reduces the entry to exactly zero; the ledger removes it.
        self.ledger
            .apply_delta(trade.ticker(), close_delta, &trade.instrument, close_strategy);

        let open_strategy = StrategyLabel::for_new_position(open_delta, kind);
        let open_opposite = open_strategy.opposes(open_delta, kind);
        let open_leg = self.emit(
            source_index,
            trade,
            open_strategy,
            open_lots,
            true,
            open_opposite,
            open_costs,
        );
        tracing::debug!(
            ticker = %trade.ticker(),
            lots = %open_lots,
            strategy = %open_strategy,
            "split open leg"
        );
        self.ledger
            .apply_delta(trade.ticker(), open_delta, &trade.instrument, open_strategy);

        vec![close_leg, open_leg]
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        source_index: usize,
        trade: &Trade,
        strategy: StrategyLabel,
        lots: Decimal,
        is_split: bool,
        is_opposite: bool,
        costs: CostAttrs,
    ) -> ProcessedTradeRecord {
        let sign = if trade.lots < Decimal::ZERO {
            Decimal::NEGATIVE_ONE
        } else {
            Decimal::ONE
        };
        let signed_lots = lots * sign;
        ProcessedTradeRecord {
            source_index,
            ticker: trade.ticker().to_string(),
            strategy,
            lots,
            signed_lots,
            signed_quantity: signed_lots * Decimal::from(trade.instrument.lot_size),
            lot_size: trade.instrument.lot_size,
            is_split,
            is_opposite,
            costs,
        }
    }
}

/// Pro-rates commission and taxes across the two legs of a split.
///
/// The close leg takes its share rounded half-even at 2 decimals; the
/// open leg takes the remainder, so the legs always sum exactly to the
/// original and rounding residue is never dropped. The trade date is
/// carried verbatim on both legs.
fn split_costs(
    costs: &CostAttrs,
    close_lots: Decimal,
    total_lots: Decimal,
) -> (CostAttrs, CostAttrs) {
    let ratio = if total_lots > Decimal::ZERO {
        close_lots / total_lots
    } else {
        Decimal::new(5, 1)
    };

    let prorate = |amount: Option<Decimal>| -> (Option<Decimal>, Option<Decimal>) {
        match amount {
            Some(total) => {
                let close_share = (total * ratio)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
                (Some(close_share), Some(total - close_share))
            }
            None => (None, None),
        }
    };

    let (close_commission, open_commission) = prorate(costs.commission);
    let (close_taxes, open_taxes) = prorate(costs.taxes);

    (
        CostAttrs {
            commission: close_commission,
            taxes: close_taxes,
            trade_date: costs.trade_date.clone(),
        },
        CostAttrs {
            commission: open_commission,
            taxes: open_taxes,
            trade_date: costs.trade_date.clone(),
        },
    )
}
