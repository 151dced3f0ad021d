//! CSV sinks for the engine's outputs.
//!
//! The core hands over strongly typed records; layout decisions
//! (column order, Yes/No flags, date formats) live here.

use anyhow::{Context, Result};
use csv::Writer;
use std::fs::File;
use std::path::Path;
use trade_recon_core::{LedgerEntry, ProcessedTradeRecord};

/// Writes processed-trade legs in emission order.
///
/// Format: one row per leg, signed lot/quantity carriers, blank cost
/// cells when the source trade carried no cost attributes.
///
/// # Errors
/// Returns an error if the file cannot be created or writing fails.
pub fn write_processed_trades(
    path: impl AsRef<Path>,
    records: &[ProcessedTradeRecord],
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "Trade_Index",
        "Ticker",
        "Strategy",
        "Lots",
        "QTY",
        "Lot_Size",
        "Split?",
        "Opposite?",
        "Comms",
        "Taxes",
        "TD",
    ])?;

    for record in records {
        writer.write_record(&[
            record.source_index.to_string(),
            record.ticker.clone(),
            record.strategy.to_string(),
            record.signed_lots.to_string(),
            record.signed_quantity.to_string(),
            record.lot_size.to_string(),
            record.split_flag().to_string(),
            record.opposite_flag().to_string(),
            record
                .costs
                .commission
                .map(|v| v.to_string())
                .unwrap_or_default(),
            record.costs.taxes.map(|v| v.to_string()).unwrap_or_default(),
            record.costs.trade_date.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    tracing::info!(count = records.len(), file = %path.display(), "wrote processed trades");
    Ok(())
}

/// Writes the final ledger snapshot, one row per live position.
///
/// Expiry is rendered as DD/MM/YYYY to match the clearing-file
/// convention.
///
/// # Errors
/// Returns an error if the file cannot be created or writing fails.
pub fn write_snapshot(path: impl AsRef<Path>, entries: &[LedgerEntry]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create snapshot file: {}", path.display()))?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "Ticker",
        "Symbol",
        "Security_Type",
        "Expiry",
        "Strike",
        "Lots",
        "Lot_Size",
        "QTY",
        "Strategy",
        "Direction",
        "Underlying",
    ])?;

    for entry in entries {
        let inst = &entry.instrument;
        writer.write_record(&[
            inst.ticker.clone(),
            inst.symbol.clone(),
            inst.kind.to_string(),
            inst.expiry.format("%d/%m/%Y").to_string(),
            inst.strike.to_string(),
            entry.lots.to_string(),
            inst.lot_size.to_string(),
            entry.quantity.to_string(),
            entry.strategy.to_string(),
            entry.direction().to_string(),
            inst.underlying.clone(),
        ])?;
    }

    writer.flush()?;
    tracing::info!(count = entries.len(), file = %path.display(), "wrote ledger snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use trade_recon_core::{
        CostAttrs, Instrument, InstrumentKind, OpeningPosition, PositionLedger, StrategyLabel,
    };

    fn instrument(ticker: &str) -> Instrument {
        Instrument::new(
            ticker.to_string(),
            "NIFTY".to_string(),
            InstrumentKind::Future,
            NaiveDate::from_ymd_opt(2025, 9, 25).unwrap(),
            Decimal::ZERO,
            50,
            "NZ".to_string(),
        )
    }

    #[test]
    fn processed_trades_round_trip_columns() {
        let record = ProcessedTradeRecord {
            source_index: 3,
            ticker: "NZU5 Index".to_string(),
            strategy: StrategyLabel::ShortExposure,
            lots: dec!(5),
            signed_lots: dec!(-5),
            signed_quantity: dec!(-250),
            lot_size: 50,
            is_split: true,
            is_opposite: false,
            costs: CostAttrs {
                commission: Some(dec!(6.26)),
                taxes: None,
                trade_date: Some("2025-08-14".to_string()),
            },
        };

        let file = tempfile::NamedTempFile::new().unwrap();
        write_processed_trades(file.path(), &[record]).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Trade_Index,Ticker,Strategy,Lots,QTY,Lot_Size,Split?,Opposite?,Comms,Taxes,TD"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3,NZU5 Index,FUSH,-5,-250,50,Yes,No,6.26,,2025-08-14"
        );
    }

    #[test]
    fn snapshot_rows_match_ledger_order() {
        let ledger = PositionLedger::seeded(vec![
            OpeningPosition {
                instrument: instrument("ZEE=U5 IS Equity"),
                lots: dec!(-2),
            },
            OpeningPosition {
                instrument: instrument("NZU5 Index"),
                lots: dec!(5),
            },
        ]);

        let file = tempfile::NamedTempFile::new().unwrap();
        write_snapshot(file.path(), &ledger.snapshot()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("NZU5 Index,NIFTY,Futures,25/09/2025,0,5,50,250,FULO,Long,NZ"));
        assert!(lines[2].starts_with("ZEE=U5 IS Equity"));
    }
}
