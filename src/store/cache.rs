//! Short-lived in-memory price cache.
//!
//! Entries are stamped with the instant they were fetched; a read older
//! than the configured TTL behaves as a miss. There is no background
//! eviction, stale entries are simply overwritten by the next fetch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::models::quote::Quote;

struct CachedQuote {
    quote: Quote,
    fetched: Instant,
}

/// TTL cache keyed by `"{market}:{symbol}"`.
#[derive(Clone)]
pub struct PriceCache {
    inner: Arc<DashMap<String, CachedQuote>>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Return the cached quote if it is still fresh.
    ///
    /// The returned snapshot is marked `cached: true` so responses show
    /// whether an upstream call was made.
    pub fn get(&self, key: &str) -> Option<Quote> {
        let entry = self.inner.get(key)?;
        if entry.fetched.elapsed() >= self.ttl {
            return None;
        }

        let mut quote = entry.quote.clone();
        quote.cached = true;
        Some(quote)
    }

    /// Store a freshly fetched quote, replacing any previous entry.
    pub fn put(&self, key: String, quote: Quote) {
        self.inner.insert(
            key,
            CachedQuote {
                quote,
                fetched: Instant::now(),
            },
        );
    }
}

/// Cache key for a market/symbol pair.
pub fn cache_key(market: &str, symbol: &str) -> String {
    format!("{market}:{}", symbol.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price,
            currency: "USD".to_string(),
            source: "test",
            fetched_at: Utc::now(),
            cached: false,
        }
    }

    #[test]
    fn fresh_entry_is_served_and_marked_cached() {
        let cache = PriceCache::new(Duration::from_secs(30));
        cache.put(cache_key("crypto", "btc"), quote("BTCUSDT", 64_000.0));

        let hit = cache.get(&cache_key("crypto", "BTC")).unwrap();
        assert_eq!(hit.price, 64_000.0);
        assert!(hit.cached);
    }

    #[test]
    fn entry_older_than_ttl_is_a_miss() {
        let cache = PriceCache::new(Duration::ZERO);
        cache.put(cache_key("stock", "AAPL"), quote("AAPL", 230.0));

        assert!(cache.get(&cache_key("stock", "AAPL")).is_none());
    }

    #[test]
    fn put_overwrites_previous_entry() {
        let cache = PriceCache::new(Duration::from_secs(30));
        let key = cache_key("forex", "EUR/USD");

        cache.put(key.clone(), quote("EUR/USD", 1.08));
        cache.put(key.clone(), quote("EUR/USD", 1.09));

        assert_eq!(cache.get(&key).unwrap().price, 1.09);
    }

    #[test]
    fn unknown_key_is_a_miss() {
        let cache = PriceCache::new(Duration::from_secs(30));
        assert!(cache.get("crypto:ETH").is_none());
    }
}
