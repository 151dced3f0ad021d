#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

use crate::ledger::{BookSummary, PositionLedger};
use crate::record::ProcessedTradeRecord;
use crate::strategy::StrategyLabel;

/// Aggregate statistics for one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub trades_in: usize,
    pub records_out: usize,
    pub split_trades: usize,
    pub opposite_flags: usize,
    pub long_exposure_legs: usize,
    pub short_exposure_legs: usize,
    /// Final-book breakdown by direction, kind, and label.
    pub book: BookSummary,
}

impl RunSummary {
    /// Builds the summary from the emitted record sequence and the
    /// final ledger state.
    #[must_use]
    pub fn from_run(
        trades_in: usize,
        records: &[ProcessedTradeRecord],
        ledger: &PositionLedger,
    ) -> Self {
        // Both legs of a split share a source index; count the trade once.
        let split_trades = records
            .iter()
            .filter(|r| r.is_split)
            .map(|r| r.source_index)
            .collect::<std::collections::HashSet<_>>()
            .len();
        Self {
            trades_in,
            records_out: records.len(),
            split_trades,
            opposite_flags: records.iter().filter(|r| r.is_opposite).count(),
            long_exposure_legs: records
                .iter()
                .filter(|r| r.strategy == StrategyLabel::LongExposure)
                .count(),
            short_exposure_legs: records
                .iter()
                .filter(|r| r.strategy == StrategyLabel::ShortExposure)
                .count(),
            book: ledger.summary(),
        }
    }
}

pub struct SummaryFormatter;

impl SummaryFormatter {
    #[must_use]
    pub fn format(summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                 RECONCILIATION SUMMARY                        \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("Trades\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("Trades In:             {}\n", summary.trades_in));
        output.push_str(&format!("Records Out:           {}\n", summary.records_out));
        output.push_str(&format!("Split Trades:          {}\n", summary.split_trades));
        output.push_str(&format!(
            "Opposite Flags:        {}\n",
            summary.opposite_flags
        ));
        output.push_str(&format!(
            "FULO Legs:             {}\n",
            summary.long_exposure_legs
        ));
        output.push_str(&format!(
            "FUSH Legs:             {}\n",
            summary.short_exposure_legs
        ));
        output.push('\n');

        output.push_str("Final Book\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("Open Positions:        {}\n", summary.book.total));
        output.push_str(&format!("Long Positions:        {}\n", summary.book.long));
        output.push_str(&format!("Short Positions:       {}\n", summary.book.short));
        output.push_str(&format!(
            "By Kind:               {} Futures / {} Calls / {} Puts\n",
            summary.book.futures, summary.book.calls, summary.book.puts
        ));
        output.push_str(&format!(
            "By Strategy:           {} FULO / {} FUSH\n",
            summary.book.long_exposure, summary.book.short_exposure
        ));
        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        if summary.trades_in == 0 {
            output.push_str("\nNo trades were processed in this run.\n\n");
        }

        output
    }
}
