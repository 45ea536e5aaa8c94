//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::keys::KeyAccessError;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the
/// application. Each variant maps to a specific HTTP status code and error
/// message.
///
/// # Error Categories
///
/// - **Authentication Errors**: invalid or expired API keys
/// - **Quota Errors**: keys whose call allowance is used up
/// - **Resource Errors**: unknown orders or alerts
/// - **Upstream Errors**: the payment processor or a price provider failed
/// - **Validation Errors**: invalid request data
///
/// The payment webhook never surfaces any of these to its caller: the
/// processor is always acknowledged with success and faults are only
/// logged (see the payments handler).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// API key is missing its prefix, malformed, or not in the key store.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// API key exists but is past its expiry timestamp.
    ///
    /// Returns HTTP 401 Unauthorized, with a code distinct from
    /// `InvalidApiKey` so clients know renewal (not retyping) is needed.
    #[error("API key expired")]
    ApiKeyExpired,

    /// API key exists and is current, but has no calls remaining.
    ///
    /// Returns HTTP 429 Too Many Requests.
    #[error("API key call quota exhausted")]
    QuotaExhausted,

    /// Requested order does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Order not found")]
    OrderNotFound,

    /// Requested alert does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Alert not found")]
    AlertNotFound,

    /// The payment processor could not be reached or refused the request.
    ///
    /// Returns HTTP 503 Service Unavailable; the caller may retry, no
    /// order state was persisted.
    #[error("Payment processor unavailable: {0}")]
    PaymentProcessorUnavailable(String),

    /// A price upstream failed or returned an unexpected payload.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Transport-level failure talking to a price upstream.
    ///
    /// This wraps any reqwest::Error using the `#[from]` attribute, which
    /// automatically implements `From<reqwest::Error> for AppError`.
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert key-store rejections into their HTTP-facing errors.
impl From<KeyAccessError> for AppError {
    fn from(err: KeyAccessError) -> Self {
        match err {
            KeyAccessError::Unknown => AppError::InvalidApiKey,
            KeyAccessError::Expired => AppError::ApiKeyExpired,
            KeyAccessError::Exhausted => AppError::QuotaExhausted,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidApiKey` → 401 Unauthorized
/// - `ApiKeyExpired` → 401 Unauthorized
/// - `QuotaExhausted` → 429 Too Many Requests
/// - `OrderNotFound` / `AlertNotFound` → 404 Not Found
/// - `PaymentProcessorUnavailable` → 503 Service Unavailable
/// - `Upstream` / `Http` → 502 Bad Gateway (hides transport details)
/// - `InvalidRequest` → 400 Bad Request
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::ApiKeyExpired => (
                StatusCode::UNAUTHORIZED,
                "api_key_expired",
                self.to_string(),
            ),
            AppError::QuotaExhausted => (
                StatusCode::TOO_MANY_REQUESTS,
                "quota_exhausted",
                self.to_string(),
            ),
            AppError::OrderNotFound => {
                (StatusCode::NOT_FOUND, "order_not_found", self.to_string())
            }
            AppError::AlertNotFound => {
                (StatusCode::NOT_FOUND, "alert_not_found", self.to_string())
            }
            AppError::PaymentProcessorUnavailable(ref msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "payment_processor_unavailable",
                msg.clone(),
            ),
            AppError::Upstream(ref msg) => {
                (StatusCode::BAD_GATEWAY, "upstream_error", msg.clone())
            }
            AppError::Http(_) => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "Upstream request failed".to_string(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
