use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Symbol-to-root mapping file for the instrument resolver.
    pub mapping_file: String,
    /// Lot size assumed when a symbol is missing from the mapping.
    pub default_lot_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
    pub processed_trades_file: String,
    pub snapshot_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                mapping_file: "futures mapping.csv".to_string(),
                default_lot_size: 1,
            },
            output: OutputConfig {
                directory: "output".to_string(),
                processed_trades_file: "processed_trades.csv".to_string(),
                snapshot_file: "final_positions.csv".to_string(),
            },
        }
    }
}
