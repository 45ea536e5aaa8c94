//! Unified price endpoints.
//!
//! This module implements the price surface:
//! - GET /api/v1/prices/crypto/:symbol
//! - GET /api/v1/prices/stock/:symbol
//! - GET /api/v1/prices/forex/:base/:quote
//!
//! All three sit behind the key validation gate and share the same
//! cache-then-fetch path; responses mark whether the cache answered.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::AppError;
use crate::models::quote::Quote;
use crate::services::quote_service;
use crate::state::AppState;

/// Get a crypto price.
///
/// # Endpoint
///
/// `GET /api/v1/prices/crypto/:symbol`
///
/// Bare symbols are quoted against USDT: `/prices/crypto/BTC` resolves the
/// `BTCUSDT` pair.
///
/// # Response
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
pub async fn crypto_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(quote_service::crypto_quote(&state, &symbol).await?))
}

/// Get a stock price.
///
/// # Endpoint
///
/// `GET /api/v1/prices/stock/:symbol`
pub async fn stock_price(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(quote_service::stock_quote(&state, &symbol).await?))
}

/// Get a forex rate.
///
/// # Endpoint
///
/// `GET /api/v1/prices/forex/:base/:quote`
///
/// Example: `/api/v1/prices/forex/EUR/USD` returns how many USD one EUR
/// buys.
pub async fn forex_rate(
    State(state): State<AppState>,
    Path((base, quote)): Path<(String, String)>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(
        quote_service::forex_quote(&state, &base, &quote).await?,
    ))
}
