//! Price fetching against the public upstream APIs.
//!
//! Every fetch goes through the same shape: consult the cache, call the
//! upstream with the shared time-bounded client, pull the price out of the
//! provider's JSON, store and return a unified `Quote`. The upstream
//! payloads are treated as opaque JSON and only the fields the gateway
//! re-exposes are extracted.

use serde_json::Value;

use crate::error::AppError;
use crate::models::alert::MarketKind;
use crate::models::quote::Quote;
use crate::state::AppState;
use crate::store::cache;

/// Fetch a crypto price by trading symbol.
///
/// Bare symbols are quoted against USDT (`BTC` becomes `BTCUSDT`);
/// fully-qualified pairs are passed through unchanged.
pub async fn crypto_quote(state: &AppState, symbol: &str) -> Result<Quote, AppError> {
    let symbol = symbol.to_ascii_uppercase();
    let pair = if symbol.ends_with("USDT") {
        symbol
    } else {
        format!("{symbol}USDT")
    };

    let key = cache::cache_key("crypto", &pair);
    if let Some(hit) = state.quotes.get(&key) {
        return Ok(hit);
    }

    let url = format!("{}/api/v3/ticker/price", state.config.crypto_api_base);
    let payload: Value = state
        .http
        .get(&url)
        .query(&[("symbol", pair.as_str())])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let price = crypto_price_from(&payload)
        .ok_or_else(|| AppError::Upstream(format!("no price for symbol {pair}")))?;

    let quote = Quote {
        symbol: pair,
        price,
        currency: "USD".to_string(),
        source: "binance",
        fetched_at: chrono::Utc::now(),
        cached: false,
    };
    state.quotes.put(key, quote.clone());
    Ok(quote)
}

/// Fetch a stock price by ticker.
pub async fn stock_quote(state: &AppState, symbol: &str) -> Result<Quote, AppError> {
    let symbol = symbol.to_ascii_uppercase();

    let key = cache::cache_key("stock", &symbol);
    if let Some(hit) = state.quotes.get(&key) {
        return Ok(hit);
    }

    let url = format!(
        "{}/v8/finance/chart/{symbol}",
        state.config.stock_api_base
    );
    let payload: Value = state
        .http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let (price, currency) = stock_price_from(&payload)
        .ok_or_else(|| AppError::Upstream(format!("no quote for ticker {symbol}")))?;

    let quote = Quote {
        symbol,
        price,
        currency,
        source: "yahoo-finance",
        fetched_at: chrono::Utc::now(),
        cached: false,
    };
    state.quotes.put(key, quote.clone());
    Ok(quote)
}

/// Fetch a forex rate for a base/quote currency pair.
pub async fn forex_quote(state: &AppState, base: &str, quote: &str) -> Result<Quote, AppError> {
    let base = base.to_ascii_uppercase();
    let counter = quote.to_ascii_uppercase();
    let pair = format!("{base}/{counter}");

    let key = cache::cache_key("forex", &pair);
    if let Some(hit) = state.quotes.get(&key) {
        return Ok(hit);
    }

    let url = format!("{}/v1/latest", state.config.forex_api_base);
    let payload: Value = state
        .http
        .get(&url)
        .query(&[("base", base.as_str()), ("symbols", counter.as_str())])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let price = forex_rate_from(&payload, &counter)
        .ok_or_else(|| AppError::Upstream(format!("no rate for pair {pair}")))?;

    let result = Quote {
        symbol: pair,
        price,
        currency: counter,
        source: "frankfurter",
        fetched_at: chrono::Utc::now(),
        cached: false,
    };
    state.quotes.put(key, result.clone());
    Ok(result)
}

/// Fetch a price for an alert's market/symbol combination.
///
/// Forex alerts store their pair as `"BASE/QUOTE"`; the other markets use
/// the symbol as-is.
pub async fn market_quote(
    state: &AppState,
    market: MarketKind,
    symbol: &str,
) -> Result<Quote, AppError> {
    match market {
        MarketKind::Crypto => crypto_quote(state, symbol).await,
        MarketKind::Stock => stock_quote(state, symbol).await,
        MarketKind::Forex => {
            let (base, counter) = split_pair(symbol)?;
            forex_quote(state, base, counter).await
        }
    }
}

/// Split a `"BASE/QUOTE"` pair into its halves.
pub fn split_pair(symbol: &str) -> Result<(&str, &str), AppError> {
    match symbol.split_once('/') {
        Some((base, counter)) if !base.is_empty() && !counter.is_empty() => Ok((base, counter)),
        _ => Err(AppError::InvalidRequest(format!(
            "forex symbol must look like BASE/QUOTE, got \"{symbol}\""
        ))),
    }
}

/// Pull the price out of a ticker-price payload (`{"symbol", "price"}`,
/// price serialized as a string).
fn crypto_price_from(payload: &Value) -> Option<f64> {
    payload.get("price")?.as_str()?.parse().ok()
}

/// Pull price and currency out of a chart payload
/// (`chart.result[0].meta.regularMarketPrice` / `.currency`).
fn stock_price_from(payload: &Value) -> Option<(f64, String)> {
    let meta = payload
        .get("chart")?
        .get("result")?
        .get(0)?
        .get("meta")?;
    let price = meta.get("regularMarketPrice")?.as_f64()?;
    let currency = meta
        .get("currency")
        .and_then(Value::as_str)
        .unwrap_or("USD")
        .to_string();
    Some((price, currency))
}

/// Pull the rate for one counter currency out of a latest-rates payload
/// (`{"rates": {"EUR": 0.92}}`).
fn forex_rate_from(payload: &Value, counter: &str) -> Option<f64> {
    payload.get("rates")?.get(counter)?.as_f64()
}
