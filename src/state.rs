//! Shared application state.
//!
//! Everything a handler needs travels in one cloneable `AppState` injected
//! via Axum's `State` extraction. The stores clone as handles onto the
//! same underlying maps, so every request sees the same process-wide
//! tables.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::payment_service::PaymentProcessor;
use crate::store::alerts::AlertStore;
use crate::store::cache::PriceCache;
use crate::store::keys::KeyStore;
use crate::store::orders::OrderStore;

/// How long a price-upstream request may take before it is abandoned.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Orders awaiting or past payment confirmation
    pub orders: OrderStore,

    /// Issued API keys and their remaining quota
    pub keys: KeyStore,

    /// Threshold alert rules
    pub alerts: AlertStore,

    /// Short-lived price cache consulted before any upstream call
    pub quotes: PriceCache,

    /// Client for the external payment processor
    pub processor: Arc<PaymentProcessor>,

    /// Shared HTTP client for price upstreams
    pub http: reqwest::Client,
}

impl AppState {
    /// Build the process-wide state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `PUBLIC_URL` cannot be parsed into a callback
    /// URL or an HTTP client cannot be constructed.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let processor = PaymentProcessor::new(&config)?;

        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;

        Ok(Self {
            quotes: PriceCache::new(Duration::from_secs(config.price_cache_ttl_secs)),
            config: Arc::new(config),
            orders: OrderStore::new(),
            keys: KeyStore::new(),
            alerts: AlertStore::new(),
            processor: Arc::new(processor),
            http,
        })
    }
}

#[cfg(test)]
impl AppState {
    /// Fresh state with test configuration; no outbound call is made.
    pub(crate) fn for_tests() -> Self {
        Self::new(Config::for_tests()).expect("test state must build")
    }
}
