//! CSV ingestion of opening-position and trade files.
//!
//! Input files are normalized tabular rows:
//! `symbol,kind,expiry,strike,lots[,lot_size[,commission,taxes,trade_date]]`.
//! The first row may or may not be a header; it is sniffed the same way
//! for both file types. Expiry dates arrive in whatever format the
//! upstream system produced, so several formats are tried in order.
//!
//! Zero-lot rows are dropped here: the engine's contract says every
//! trade it sees has non-zero signed lots.

use crate::resolver::InstrumentResolver;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use trade_recon_core::{CostAttrs, InstrumentKind, OpeningPosition, Trade};

/// Row-level contract violations in input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("row {row}: missing field `{field}`")]
    MissingField { row: usize, field: &'static str },
    #[error("row {row}: invalid number in `{field}`: {value}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: unrecognized date format: {value}")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: unknown instrument kind: {value}")]
    UnknownKind { row: usize, value: String },
}

const COL_SYMBOL: usize = 0;
const COL_KIND: usize = 1;
const COL_EXPIRY: usize = 2;
const COL_STRIKE: usize = 3;
const COL_LOTS: usize = 4;
const COL_LOT_SIZE: usize = 5;
const COL_COMMISSION: usize = 6;
const COL_TAXES: usize = 7;
const COL_TRADE_DATE: usize = 8;

/// Loads the begin-of-day position book.
///
/// # Errors
/// Returns an error if the file cannot be read or a row violates the
/// input contract.
pub fn load_opening_positions(
    path: impl AsRef<Path>,
    resolver: &InstrumentResolver,
) -> Result<Vec<OpeningPosition>> {
    let path = path.as_ref();
    let rows = read_rows(path)?;

    let mut positions = Vec::with_capacity(rows.len());
    for (row_number, record) in rows {
        let parsed = parse_row(&record, row_number, resolver)?;
        let Some((instrument, lots, _)) = parsed else {
            continue;
        };
        positions.push(OpeningPosition { instrument, lots });
    }

    tracing::info!(
        count = positions.len(),
        file = %path.display(),
        "loaded opening positions"
    );
    Ok(positions)
}

/// Loads the ordered trade list. File order is preserved; it is part of
/// the engine's correctness contract.
///
/// # Errors
/// Returns an error if the file cannot be read or a row violates the
/// input contract.
pub fn load_trades(path: impl AsRef<Path>, resolver: &InstrumentResolver) -> Result<Vec<Trade>> {
    let path = path.as_ref();
    let rows = read_rows(path)?;

    let mut trades = Vec::with_capacity(rows.len());
    for (row_number, record) in rows {
        let parsed = parse_row(&record, row_number, resolver)?;
        let Some((instrument, lots, costs)) = parsed else {
            continue;
        };
        trades.push(Trade::with_costs(instrument, lots, costs));
    }

    tracing::info!(count = trades.len(), file = %path.display(), "loaded trades");
    Ok(trades)
}

/// Reads all rows, dropping the first when it sniffs as a header.
fn read_rows(path: &Path) -> Result<Vec<(usize, csv::StringRecord)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {index}"))?;
        rows.push((index, record));
    }

    if let Some((_, first)) = rows.first() {
        if looks_like_header(first) {
            tracing::debug!(file = %path.display(), "first row detected as header");
            rows.remove(0);
        }
    }
    Ok(rows)
}

/// Header sniffing: keyword match first, then a numeric probe of the
/// lots column.
fn looks_like_header(record: &csv::StringRecord) -> bool {
    const KEYWORDS: [&str; 8] = [
        "symbol", "expiry", "strike", "option", "instr", "qty", "price", "lots",
    ];
    let joined = record
        .iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    if KEYWORDS.iter().any(|k| joined.contains(k)) {
        return true;
    }
    record
        .get(COL_LOTS)
        .map_or(true, |v| v.trim().parse::<f64>().is_err())
}

/// Parses one data row. Returns `None` for zero-lot rows, which are
/// logged and dropped.
fn parse_row(
    record: &csv::StringRecord,
    row: usize,
    resolver: &InstrumentResolver,
) -> Result<Option<(trade_recon_core::Instrument, Decimal, CostAttrs)>> {
    let symbol = required(record, row, COL_SYMBOL, "symbol")?;
    let kind = parse_kind(required(record, row, COL_KIND, "kind")?, row)?;
    let expiry = parse_date(required(record, row, COL_EXPIRY, "expiry")?, row)?;
    // Futures rows legitimately leave the strike cell blank.
    let strike = parse_decimal(record, row, COL_STRIKE, "strike")?.unwrap_or(Decimal::ZERO);
    let lots = parse_decimal(record, row, COL_LOTS, "lots")?
        .ok_or(LoadError::MissingField { row, field: "lots" })?;

    if lots.is_zero() {
        tracing::warn!(symbol = %symbol, row, "dropping zero-lot row");
        return Ok(None);
    }

    let lot_size = match optional(record, COL_LOT_SIZE) {
        Some(value) => Some(value.parse::<u32>().map_err(|_| LoadError::InvalidNumber {
            row,
            field: "lot_size",
            value: value.to_string(),
        })?),
        None => None,
    };

    let costs = CostAttrs {
        commission: parse_decimal(record, row, COL_COMMISSION, "commission")?,
        taxes: parse_decimal(record, row, COL_TAXES, "taxes")?,
        trade_date: optional(record, COL_TRADE_DATE).map(str::to_string),
    };

    let instrument = resolver.resolve(symbol, kind, expiry, strike, lot_size);
    Ok(Some((instrument, lots, costs)))
}

fn required<'a>(
    record: &'a csv::StringRecord,
    row: usize,
    col: usize,
    field: &'static str,
) -> Result<&'a str, LoadError> {
    record
        .get(col)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(LoadError::MissingField { row, field })
}

fn optional(record: &csv::StringRecord, col: usize) -> Option<&str> {
    record.get(col).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_decimal(
    record: &csv::StringRecord,
    row: usize,
    col: usize,
    field: &'static str,
) -> Result<Option<Decimal>, LoadError> {
    match optional(record, col) {
        Some(value) => Decimal::from_str(value)
            .map(Some)
            .map_err(|_| LoadError::InvalidNumber {
                row,
                field,
                value: value.to_string(),
            }),
        None => Ok(None),
    }
}

fn parse_kind(value: &str, row: usize) -> Result<InstrumentKind, LoadError> {
    let upper = value.to_uppercase();
    if upper.starts_with("FUT") {
        return Ok(InstrumentKind::Future);
    }
    match upper.as_str() {
        "CALL" | "CE" | "C" => Ok(InstrumentKind::Call),
        "PUT" | "PE" | "P" => Ok(InstrumentKind::Put),
        _ => Err(LoadError::UnknownKind {
            row,
            value: value.to_string(),
        }),
    }
}

/// Multi-format expiry parsing, day-first formats preferred.
fn parse_date(value: &str, row: usize) -> Result<NaiveDate, LoadError> {
    const FORMATS: [&str; 10] = [
        "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%y", "%d-%b-%Y",
        "%d-%b-%y", "%d%b%Y", "%d.%m.%Y",
    ];
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    Err(LoadError::InvalidDate {
        row,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    fn resolver() -> InstrumentResolver {
        InstrumentResolver::new(1)
    }

    #[test]
    fn loads_trades_with_header() {
        let file = write_file(
            "Symbol,Instr,Expiry,Strike,Lots,Lot_Size\n\
             NIFTY,FUTIDX,25/09/2025,0,5,\n\
             RIL,CE,27/03/2025,1200,-3,250\n",
        );
        let trades = load_trades(file.path(), &resolver()).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].ticker(), "NZU5 Index");
        assert_eq!(trades[0].lots, dec!(5));
        assert_eq!(trades[1].instrument.kind, InstrumentKind::Call);
        assert_eq!(trades[1].lots, dec!(-3));
        assert_eq!(trades[1].instrument.lot_size, 250);
    }

    #[test]
    fn loads_headerless_file() {
        let file = write_file("NIFTY,FUTIDX,25/09/2025,0,5\n");
        let trades = load_trades(file.path(), &resolver()).unwrap();
        assert_eq!(trades.len(), 1);
    }

    #[test]
    fn drops_zero_lot_rows() {
        let file = write_file(
            "NIFTY,FUTIDX,25/09/2025,0,5\n\
             RIL,PE,27/03/2025,1200,0,250\n",
        );
        let trades = load_trades(file.path(), &resolver()).unwrap();
        assert_eq!(trades.len(), 1);
    }

    #[test]
    fn cost_columns_populate_tagged_presence() {
        let file = write_file(
            "NIFTY,FUTIDX,25/09/2025,0,5,,12.50,3.75,2025-08-14\n\
             NIFTY,FUTIDX,25/09/2025,0,2\n",
        );
        let trades = load_trades(file.path(), &resolver()).unwrap();

        assert_eq!(trades[0].costs.commission, Some(dec!(12.50)));
        assert_eq!(trades[0].costs.taxes, Some(dec!(3.75)));
        assert_eq!(trades[0].costs.trade_date.as_deref(), Some("2025-08-14"));
        assert!(trades[1].costs.is_empty());
    }

    #[test]
    fn date_format_sniffing() {
        for (raw, expected) in [
            ("25/09/2025", (2025, 9, 25)),
            ("2025-09-25", (2025, 9, 25)),
            ("26-Sep-2025", (2025, 9, 26)),
            ("26SEP2025", (2025, 9, 26)),
        ] {
            let date = parse_date(raw, 0).unwrap();
            let (y, m, d) = expected;
            assert_eq!(date, NaiveDate::from_ymd_opt(y, m, d).unwrap(), "{raw}");
        }
    }

    #[test]
    fn blank_strike_defaults_to_zero() {
        let file = write_file("NIFTY,FUTIDX,25/09/2025,,5\n");
        let trades = load_trades(file.path(), &resolver()).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].instrument.strike, Decimal::ZERO);
        assert_eq!(trades[0].lots, dec!(5));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let file = write_file("NIFTY,SWAP,25/09/2025,0,5\n");
        let err = load_trades(file.path(), &resolver()).unwrap_err();
        assert!(err.to_string().contains("unknown instrument kind"));
    }

    #[test]
    fn bad_date_is_rejected() {
        let file = write_file("NIFTY,FUTIDX,someday,0,5\n");
        let err = load_trades(file.path(), &resolver()).unwrap_err();
        assert!(err.to_string().contains("unrecognized date"));
    }

    #[test]
    fn opening_positions_preserve_sign() {
        let file = write_file(
            "Symbol,Instr,Expiry,Strike,Lots\n\
             NIFTY,FUTIDX,25/09/2025,0,-10\n",
        );
        let positions = load_opening_positions(file.path(), &resolver()).unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].lots, dec!(-10));
    }
}
