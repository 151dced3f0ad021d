//! Symbol-to-ticker resolution.
//!
//! Maps a raw exchange symbol plus instrument kind to a canonical
//! Bloomberg-style ticker, an underlying grouping key, and a lot size.
//! Pure lookup: the resolver holds the loaded mapping table and nothing
//! else. All parsers go through this one code path so the same symbol
//! always yields the same ticker.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use trade_recon_core::{Instrument, InstrumentKind};

/// Futures month codes, January through December.
const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// Special-cased index roots: (aliases, futures root, options root, lot size).
const INDEX_RULES: &[(&[&str], &str, &str, u32)] = &[
    (&["NIFTY", "NZ", "NF"], "NZ", "NIFTY", 50),
    (&["BANKNIFTY", "AF1", "AF", "NSEBANK"], "AF1", "NSEBANK", 15),
    (&["FINNIFTY", "FNF"], "FNF", "FINNIFTY", 40),
    (&["MIDCPNIFTY", "RNS", "NMIDSELP", "MCN"], "RNS", "NMIDSELP", 75),
];

#[derive(Debug, Clone)]
struct SymbolMapping {
    root: String,
    lot_size: u32,
}

/// Resolves raw symbols to canonical instruments.
#[derive(Debug)]
pub struct InstrumentResolver {
    mappings: HashMap<String, SymbolMapping>,
    default_lot_size: u32,
}

impl InstrumentResolver {
    /// A resolver with no stock mapping table; index rules and the
    /// raw-symbol fallback still apply.
    #[must_use]
    pub fn new(default_lot_size: u32) -> Self {
        Self {
            mappings: HashMap::new(),
            default_lot_size,
        }
    }

    /// Loads the symbol mapping table from a `symbol,root,lot_size` CSV.
    ///
    /// Rows with an unparseable lot size fall back to the default; a
    /// missing root falls back to the symbol itself.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read as CSV.
    pub fn from_mapping_file(path: impl AsRef<Path>, default_lot_size: u32) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open mapping file: {}", path.display()))?;

        let mut mappings = HashMap::new();
        for result in reader.records() {
            let record = result.context("Failed to read mapping row")?;
            let Some(symbol) = record.get(0).map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            let root = record
                .get(1)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(symbol)
                .to_uppercase();
            let lot_size = record
                .get(2)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .map_or(default_lot_size, |v| v as u32);

            mappings.insert(symbol.to_uppercase(), SymbolMapping { root, lot_size });
        }

        tracing::info!(
            count = mappings.len(),
            file = %path.display(),
            "loaded symbol mappings"
        );
        Ok(Self {
            mappings,
            default_lot_size,
        })
    }

    /// Resolves one raw symbol into a canonical [`Instrument`].
    ///
    /// An explicit `lot_size` from the source file wins over the
    /// mapping table; unknown symbols fall back to the raw symbol as
    /// the Bloomberg root with the default lot size.
    #[must_use]
    pub fn resolve(
        &self,
        symbol: &str,
        kind: InstrumentKind,
        expiry: NaiveDate,
        strike: Decimal,
        lot_size: Option<u32>,
    ) -> Instrument {
        let symbol_upper = symbol.trim().to_uppercase();

        let (root, mapped_lot_size, is_index) = match index_rule(&symbol_upper) {
            Some((futures_root, options_root, index_lot)) => {
                let root = if kind == InstrumentKind::Future {
                    futures_root
                } else {
                    options_root
                };
                (root.to_string(), index_lot, true)
            }
            None => match self.mappings.get(&symbol_upper) {
                Some(mapping) => (mapping.root.clone(), mapping.lot_size, false),
                None => {
                    tracing::warn!(
                        symbol = %symbol_upper,
                        "symbol not in mapping table, using raw symbol as root"
                    );
                    (symbol_upper.clone(), self.default_lot_size, false)
                }
            },
        };

        let lot_size = lot_size.unwrap_or(mapped_lot_size);
        let ticker = generate_ticker(&root, kind, expiry, strike, is_index);
        // All contracts on the same underlying group under the futures
        // root, regardless of which root the ticker itself uses.
        let underlying = index_rule(&symbol_upper)
            .map_or_else(|| root.clone(), |(futures_root, _, _)| futures_root.to_string());

        Instrument::new(
            ticker,
            symbol_upper,
            kind,
            expiry,
            strike,
            lot_size,
            underlying,
        )
    }
}

fn index_rule(symbol: &str) -> Option<(&'static str, &'static str, u32)> {
    for (aliases, futures_root, options_root, lot_size) in INDEX_RULES {
        if aliases.contains(&symbol) {
            return Some((futures_root, options_root, *lot_size));
        }
    }
    // Anything NIFTY-flavored not covered above is still an index.
    if symbol.contains("NIFTY") {
        return Some(("NZ", "NIFTY", 50));
    }
    None
}

/// Builds the Bloomberg-style ticker string.
///
/// Futures: `NZU5 Index` (index) or `RIL=U5 IS Equity` (stock).
/// Options: `NIFTY 09/25/25 C21000 Index` or `RIL IS 09/25/25 C1200 Equity`.
fn generate_ticker(
    root: &str,
    kind: InstrumentKind,
    expiry: NaiveDate,
    strike: Decimal,
    is_index: bool,
) -> String {
    match kind {
        InstrumentKind::Future => {
            let month_code = MONTH_CODES[expiry.month0() as usize];
            let year_code = expiry.year() % 10;
            if is_index {
                format!("{root}{month_code}{year_code} Index")
            } else {
                format!("{root}={month_code}{year_code} IS Equity")
            }
        }
        InstrumentKind::Call | InstrumentKind::Put => {
            let date_str = expiry.format("%m/%d/%y");
            let opt_type = if kind == InstrumentKind::Call { 'C' } else { 'P' };
            let strike_str = format_strike(strike);
            if is_index {
                format!("{root} {date_str} {opt_type}{strike_str} Index")
            } else {
                format!("{root} IS {date_str} {opt_type}{strike_str} Equity")
            }
        }
    }
}

/// Integer rendering for whole-number strikes, decimal otherwise.
fn format_strike(strike: Decimal) -> String {
    let normalized = strike.normalize();
    normalized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn index_futures_ticker_format() {
        let resolver = InstrumentResolver::new(1);
        let inst = resolver.resolve(
            "NIFTY",
            InstrumentKind::Future,
            date(2025, 9, 25),
            Decimal::ZERO,
            None,
        );
        assert_eq!(inst.ticker, "NZU5 Index");
        assert_eq!(inst.lot_size, 50);
        assert_eq!(inst.underlying, "NZ");
    }

    #[test]
    fn index_option_uses_options_root() {
        let resolver = InstrumentResolver::new(1);
        let inst = resolver.resolve(
            "BANKNIFTY",
            InstrumentKind::Call,
            date(2025, 3, 27),
            dec!(48000),
            None,
        );
        assert_eq!(inst.ticker, "NSEBANK 03/27/25 C48000 Index");
        assert_eq!(inst.underlying, "AF1");
        assert_eq!(inst.lot_size, 15);
    }

    #[test]
    fn stock_futures_ticker_format() {
        let resolver = InstrumentResolver::new(1);
        let inst = resolver.resolve(
            "RIL",
            InstrumentKind::Future,
            date(2025, 3, 27),
            Decimal::ZERO,
            Some(250),
        );
        assert_eq!(inst.ticker, "RIL=H5 IS Equity");
        assert_eq!(inst.lot_size, 250);
    }

    #[test]
    fn stock_option_ticker_format() {
        let resolver = InstrumentResolver::new(1);
        let inst = resolver.resolve(
            "RIL",
            InstrumentKind::Put,
            date(2025, 3, 27),
            dec!(1200),
            Some(250),
        );
        assert_eq!(inst.ticker, "RIL IS 03/27/25 P1200 Equity");
    }

    #[test]
    fn fractional_strike_keeps_decimals() {
        let resolver = InstrumentResolver::new(1);
        let inst = resolver.resolve(
            "IDEA",
            InstrumentKind::Call,
            date(2025, 6, 26),
            dec!(7.50),
            Some(1),
        );
        assert_eq!(inst.ticker, "IDEA IS 06/26/25 C7.5 Equity");
    }

    #[test]
    fn mapping_file_overrides_root_and_lot_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "symbol,root,lot_size").unwrap();
        writeln!(file, "RELIANCE,RIL,250").unwrap();
        writeln!(file, "TATAMOTORS,TTMT,550").unwrap();
        file.flush().unwrap();

        let resolver = InstrumentResolver::from_mapping_file(file.path(), 1).unwrap();
        let inst = resolver.resolve(
            "RELIANCE",
            InstrumentKind::Future,
            date(2025, 9, 25),
            Decimal::ZERO,
            None,
        );
        assert_eq!(inst.ticker, "RIL=U5 IS Equity");
        assert_eq!(inst.lot_size, 250);
    }

    #[test]
    fn unknown_symbol_falls_back_to_raw_root() {
        let resolver = InstrumentResolver::new(100);
        let inst = resolver.resolve(
            "OBSCURE",
            InstrumentKind::Future,
            date(2025, 1, 30),
            Decimal::ZERO,
            None,
        );
        assert_eq!(inst.ticker, "OBSCURE=F5 IS Equity");
        assert_eq!(inst.lot_size, 100);
        assert_eq!(inst.underlying, "OBSCURE");
    }

    #[test]
    fn same_symbol_always_resolves_identically() {
        let resolver = InstrumentResolver::new(1);
        let a = resolver.resolve("NIFTY", InstrumentKind::Put, date(2025, 9, 25), dec!(21000), None);
        let b = resolver.resolve("nifty", InstrumentKind::Put, date(2025, 9, 25), dec!(21000), None);
        assert_eq!(a, b);
    }
}
