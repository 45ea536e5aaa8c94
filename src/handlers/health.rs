//! Root and health endpoints for service discovery and monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::state::AppState;

/// Health check response.
///
/// Returns service status and the sizes of the in-memory stores.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Orders tracked since startup
    pub orders_tracked: usize,

    /// API keys issued since startup
    pub keys_issued: usize,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Service descriptor served at the root.
///
/// Purely informational: names the service and indexes its endpoints so a
/// browser poke shows what lives where.
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "price_gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Unified crypto/stock/forex price API with pay-to-unlock keys",
        "endpoints": {
            "plans": "GET /api/v1/plans",
            "create_order": "POST /api/v1/orders",
            "order_status": "GET /api/v1/orders/{id}",
            "crypto_price": "GET /api/v1/prices/crypto/{symbol}",
            "stock_price": "GET /api/v1/prices/stock/{symbol}",
            "forex_rate": "GET /api/v1/prices/forex/{base}/{quote}",
            "alerts": "POST|GET /api/v1/alerts, GET|DELETE /api/v1/alerts/{id}"
        }
    }))
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "orders_tracked": 3,
///   "keys_issued": 1,
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// There is no datastore to probe; the store sizes double as a liveness
/// signal for the in-memory state.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        orders_tracked: state.orders.len(),
        keys_issued: state.keys.len(),
        timestamp: Utc::now(),
    })
}
