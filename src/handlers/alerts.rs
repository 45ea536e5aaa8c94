//! Threshold alert HTTP handlers.
//!
//! This module implements the alert endpoints:
//! - POST /api/v1/alerts - Create a threshold rule
//! - GET /api/v1/alerts - List stored rules
//! - GET /api/v1/alerts/:id - Evaluate a rule against the current price
//! - DELETE /api/v1/alerts/:id - Remove a rule
//!
//! All endpoints sit behind the key validation gate.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::alert::{Alert, AlertEvaluation, CreateAlertRequest, MarketKind};
use crate::services::quote_service;
use crate::state::AppState;

/// Create a threshold alert.
///
/// # Request Body
///
/// ```json
/// {
///   "market": "crypto",
///   "symbol": "BTC",
///   "direction": "above",
///   "threshold": 70000.0
/// }
/// ```
///
/// # Response
///
/// Returns 201 Created with the stored rule, including its generated id.
///
/// # Validation
///
/// - `threshold` must be a finite number greater than zero
/// - forex symbols must be a `BASE/QUOTE` pair
pub async fn create_alert(
    State(state): State<AppState>,
    Json(request): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<Alert>), AppError> {
    if !request.threshold.is_finite() || request.threshold <= 0.0 {
        return Err(AppError::InvalidRequest(
            "threshold must be a positive number".to_string(),
        ));
    }
    if request.market == MarketKind::Forex {
        // Fail at creation time, not on every later evaluation.
        quote_service::split_pair(&request.symbol)?;
    }

    let alert = Alert {
        id: Uuid::new_v4(),
        market: request.market,
        symbol: request.symbol,
        direction: request.direction,
        threshold: request.threshold,
        created_at: Utc::now(),
    };
    state.alerts.insert(alert.clone());

    Ok((StatusCode::CREATED, Json(alert)))
}

/// List all stored alerts.
pub async fn list_alerts(State(state): State<AppState>) -> Json<Vec<Alert>> {
    Json(state.alerts.list())
}

/// Evaluate an alert against the current price.
///
/// # Response
///
/// ```json
/// {
///   "alert": { "id": "...", "market": "crypto", "symbol": "BTC", ... },
///   "current_price": 71234.5,
///   "triggered": true,
///   "evaluated_at": "2025-01-15T10:30:00Z"
/// }
/// ```
///
/// Evaluation reads the price through the shared cache, so frequent polls
/// of the same symbol do not hammer the upstream. The stored rule is not
/// mutated.
pub async fn evaluate_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> Result<Json<AlertEvaluation>, AppError> {
    let alert = state.alerts.get(&alert_id).ok_or(AppError::AlertNotFound)?;

    let quote = quote_service::market_quote(&state, alert.market, &alert.symbol).await?;
    let triggered = alert.is_triggered(quote.price);

    Ok(Json(AlertEvaluation {
        alert,
        current_price: quote.price,
        triggered,
        evaluated_at: Utc::now(),
    }))
}

/// Delete an alert.
///
/// Returns 204 No Content on success, 404 if the id is unknown.
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.alerts.remove(&alert_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::AlertNotFound)
    }
}
