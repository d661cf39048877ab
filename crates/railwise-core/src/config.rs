//! Configuration types for Railwise

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, FeeSchedule, RateTable};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Exchange rates fed into every calculation
    #[serde(default)]
    pub rates: RateTable,

    /// Per-rail fee parameters
    #[serde(default)]
    pub fees: FeeSchedule,

    /// Label reported alongside the rate table (e.g., "revolut")
    #[serde(default = "default_rates_source")]
    pub rates_source: String,
}

fn default_api_port() -> u16 {
    19080
}

fn default_rates_source() -> String {
    "revolut".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            rates: RateTable::default(),
            fees: FeeSchedule::default(),
            rates_source: default_rates_source(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.rates.validate()?;
        self.fees.validate()?;
        Ok(())
    }
}
