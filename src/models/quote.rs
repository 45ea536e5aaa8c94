//! Price quote returned by the unified price surface.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single price observation, shaped the same way for every market.
///
/// # JSON Example
///
/// ```json
/// {
///   "symbol": "BTCUSDT",
///   "price": 64250.12,
///   "currency": "USD",
///   "source": "binance",
///   "fetched_at": "2025-01-15T10:30:00Z",
///   "cached": false
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    /// Upstream symbol the price was resolved for
    pub symbol: String,

    /// Latest known price
    pub price: f64,

    /// Currency the price is denominated in
    pub currency: String,

    /// Which upstream produced the observation
    pub source: &'static str,

    /// When the observation was fetched from the upstream
    pub fetched_at: DateTime<Utc>,

    /// Whether this response was served from the in-memory cache
    pub cached: bool,
}
