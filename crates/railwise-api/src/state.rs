//! Application state shared across API handlers

use std::sync::Arc;

use chrono::{DateTime, Utc};
use railwise_core::{AppConfig, FeeSchedule, RailError, RateTable};
use rails::{current_rates, RatesSnapshot};
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    /// When the rate table was last loaded or replaced
    rates_updated_at: RwLock<DateTime<Utc>>,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                rates_updated_at: RwLock::new(Utc::now()),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Rate table and fee schedule, read under one lock
    pub async fn pricing(&self) -> (RateTable, FeeSchedule) {
        let config = self.inner.config.read().await;
        (config.rates, config.fees.clone())
    }

    /// Current rate table stamped with its source and load time
    pub async fn rates_snapshot(&self) -> RatesSnapshot {
        let config = self.inner.config.read().await;
        let updated_at = *self.inner.rates_updated_at.read().await;
        current_rates(&config.rates, updated_at, &config.rates_source)
    }

    /// Replace the rate table
    ///
    /// The table is validated first; a rejected table leaves the current one
    /// in place.
    pub async fn set_rates(&self, rates: RateTable) -> Result<RatesSnapshot, RailError> {
        rates.validate()?;

        let now = Utc::now();
        let mut config = self.inner.config.write().await;
        config.rates = rates;
        *self.inner.rates_updated_at.write().await = now;

        tracing::info!(
            gbp_to_usd = rates.gbp_to_usd,
            gbp_to_ngn_traditional = rates.gbp_to_ngn_traditional,
            usd_to_usdt = rates.usd_to_usdt,
            usdt_to_ngn = rates.usdt_to_ngn,
            "Rate table reloaded"
        );

        Ok(current_rates(&config.rates, now, &config.rates_source))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
