mod process;
mod snapshot;

pub use process::{run_process, ProcessArgs};
pub use snapshot::{run_snapshot, SnapshotArgs};

use anyhow::Result;
use std::path::Path;
use trade_recon_core::AppConfig;
use trade_recon_data::InstrumentResolver;

/// Builds the resolver from an explicit mapping file, the configured
/// one, or (when neither exists) the raw-symbol fallback.
pub(crate) fn build_resolver(
    mapping: Option<&str>,
    config: &AppConfig,
) -> Result<InstrumentResolver> {
    let default_lot_size = config.input.default_lot_size;

    if let Some(path) = mapping {
        return InstrumentResolver::from_mapping_file(path, default_lot_size);
    }

    let configured = &config.input.mapping_file;
    if Path::new(configured).exists() {
        InstrumentResolver::from_mapping_file(configured, default_lot_size)
    } else {
        tracing::warn!(
            file = %configured,
            "mapping file not found, resolving symbols without a mapping table"
        );
        Ok(InstrumentResolver::new(default_lot_size))
    }
}
