//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment
//! variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PUBLIC_URL` (required): externally reachable base URL of this
///   service; the payment processor calls back to it
/// - `PAYOUT_ADDRESS` (required): settlement wallet that receives funds
///   forwarded by the processor
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `PAYMENT_API_BASE` (optional): payment processor base URL
/// - `PAYMENT_TICKER` (optional): settlement asset/network ticker,
///   defaults to "ltc"
/// - `CONFIRMATION_TOLERANCE` (optional): fraction of the plan price that
///   must arrive for a payment to count as confirmed, defaults to 0.95
/// - `PRICE_CACHE_TTL_SECS` (optional): price cache freshness window,
///   defaults to 30
/// - `FREE_TIER_CALLS_PER_HOUR` (optional): allowance advertised to
///   keyless callers, defaults to 50
/// - `CRYPTO_API_BASE` / `STOCK_API_BASE` / `FOREX_API_BASE` (optional):
///   price upstream base URLs
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub public_url: String,

    pub payout_address: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_payment_api_base")]
    pub payment_api_base: String,

    #[serde(default = "default_payment_ticker")]
    pub payment_ticker: String,

    #[serde(default = "default_confirmation_tolerance")]
    pub confirmation_tolerance: f64,

    #[serde(default = "default_price_cache_ttl_secs")]
    pub price_cache_ttl_secs: u64,

    #[serde(default = "default_free_tier_calls_per_hour")]
    pub free_tier_calls_per_hour: u32,

    #[serde(default = "default_crypto_api_base")]
    pub crypto_api_base: String,

    #[serde(default = "default_stock_api_base")]
    pub stock_api_base: String,

    #[serde(default = "default_forex_api_base")]
    pub forex_api_base: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_payment_api_base() -> String {
    "https://api.cryptapi.io".to_string()
}

fn default_payment_ticker() -> String {
    "ltc".to_string()
}

fn default_confirmation_tolerance() -> f64 {
    0.95
}

fn default_price_cache_ttl_secs() -> u64 {
    30
}

fn default_free_tier_calls_per_hour() -> u32 {
    50
}

fn default_crypto_api_base() -> String {
    "https://api.binance.com".to_string()
}

fn default_stock_api_base() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_forex_api_base() -> String {
    "https://api.frankfurter.dev".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is
    /// optional), then reads environment variables and deserializes them
    /// into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., PUBLIC_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: public_url -> PUBLIC_URL
        envy::from_env::<Config>()
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for tests: localhost endpoints, never dialed.
    pub(crate) fn for_tests() -> Self {
        Self {
            public_url: "http://localhost:3000".to_string(),
            payout_address: "LTC_TEST_WALLET".to_string(),
            server_port: 0,
            payment_api_base: "http://localhost:9".to_string(),
            payment_ticker: "ltc".to_string(),
            confirmation_tolerance: default_confirmation_tolerance(),
            price_cache_ttl_secs: default_price_cache_ttl_secs(),
            free_tier_calls_per_hour: default_free_tier_calls_per_hour(),
            crypto_api_base: "http://localhost:9".to_string(),
            stock_api_base: "http://localhost:9".to_string(),
            forex_api_base: "http://localhost:9".to_string(),
        }
    }
}
