//! API key validation middleware.
//!
//! This middleware intercepts every quota-consuming request to:
//! 1. Extract the API key from the Authorization header, if any
//! 2. Authorize the call against the key store, consuming one unit of quota
//! 3. Inject the resulting access context into the request
//! 4. Reject invalid, expired, or exhausted keys
//!
//! A missing key is not an error: the request proceeds under an implicit
//! free-tier allowance descriptor. No counter backs that allowance: the
//! descriptor is attached and nothing enforces it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use crate::{error::AppError, state::AppState};

/// Access context attached to every request passing the gate.
///
/// This enum is inserted into the request's extension map and can be
/// extracted by route handlers to know under which allowance the request
/// runs.
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// No key presented; implicit free-tier allowance
    Free {
        /// Advertised calls-per-hour budget for keyless callers
        calls_per_hour: u32,
    },

    /// A valid key was presented and one call was consumed
    Keyed(KeyContext),
}

/// Metadata of the key a request was authorized with.
#[derive(Debug, Clone)]
pub struct KeyContext {
    /// Plan the key was purchased under
    pub plan_id: &'static str,

    /// Quota left after this request's decrement
    pub calls_remaining: i64,

    /// When the key stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// API key validation middleware function.
///
/// # Flow
///
/// 1. Read the `Authorization: Bearer <key>` header
/// 2. Absent header: attach the free-tier descriptor and continue
/// 3. Present header: consume one call from the key store; the
///    eligibility check and the decrement are one atomic step
/// 4. Reject with 401 (unknown or expired) or 429 (exhausted); rejected
///    requests consume nothing
///
/// # Headers
///
/// Expected header format:
/// ```
/// Authorization: Bearer pgw_abc123...
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let context = match auth_header {
        // No credential at all: free tier, processing continues.
        None => AuthContext::Free {
            calls_per_hour: state.config.free_tier_calls_per_hour,
        },
        Some(value) => {
            // A presented credential must be well-formed and valid.
            let token = value.strip_prefix("Bearer ").ok_or(AppError::InvalidApiKey)?;
            let record = state.keys.consume(token, Utc::now())?;

            AuthContext::Keyed(KeyContext {
                plan_id: record.plan_id,
                calls_remaining: record.calls_remaining,
                expires_at: record.expires_at,
            })
        }
    };

    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api_key::ApiKeyRecord;
    use crate::models::plan;
    use crate::services::key_service;
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::Duration;
    use tower::ServiceExt;

    /// Echoes the access context so tests can observe what was attached.
    async fn probe(Extension(context): Extension<AuthContext>) -> String {
        match context {
            AuthContext::Free { calls_per_hour } => format!("free:{calls_per_hour}"),
            AuthContext::Keyed(key) => format!("keyed:{}:{}", key.plan_id, key.calls_remaining),
        }
    }

    fn gated_app(state: AppState) -> Router {
        Router::new()
            .route("/probe", get(probe))
            .route_layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn send(app: &Router, auth: Option<&str>) -> (StatusCode, String) {
        let mut builder = HttpRequest::builder().uri("/probe");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_key_passes_with_free_tier_descriptor() {
        let state = AppState::for_tests();
        let app = gated_app(state);

        let (status, body) = send(&app, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "free:50");
    }

    #[tokio::test]
    async fn valid_key_is_accepted_and_decremented() {
        let state = AppState::for_tests();
        let token = key_service::mint_key(&state.keys, plan::resolve(Some("pro")), None);
        let app = gated_app(state.clone());

        let (status, body) = send(&app, Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "keyed:pro:9999");
        assert_eq!(state.keys.get(&token).unwrap().calls_remaining, 9_999);
    }

    #[tokio::test]
    async fn unknown_key_is_rejected_with_401() {
        let state = AppState::for_tests();
        let app = gated_app(state);

        let (status, _) = send(&app, Some("Bearer pgw_nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_authorization_header_is_rejected() {
        let state = AppState::for_tests();
        let app = gated_app(state);

        let (status, _) = send(&app, Some("Token pgw_nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_key_is_rejected_even_with_quota_left() {
        let state = AppState::for_tests();
        let now = Utc::now();
        state.keys.insert(
            "pgw_expired".to_string(),
            ApiKeyRecord {
                plan_id: "pro",
                calls_remaining: 10_000,
                email: None,
                issued_at: now - Duration::days(31),
                expires_at: now - Duration::days(1),
            },
        );
        let app = gated_app(state.clone());

        let (status, body) = send(&app, Some("Bearer pgw_expired")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("api_key_expired"));
        assert_eq!(state.keys.get("pgw_expired").unwrap().calls_remaining, 10_000);
    }

    #[tokio::test]
    async fn exhausted_key_is_rejected_with_429() {
        let state = AppState::for_tests();
        let now = Utc::now();
        state.keys.insert(
            "pgw_lastcall".to_string(),
            ApiKeyRecord {
                plan_id: "starter",
                calls_remaining: 1,
                email: None,
                issued_at: now,
                expires_at: now + Duration::days(30),
            },
        );
        let app = gated_app(state);

        let (status, body) = send(&app, Some("Bearer pgw_lastcall")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "keyed:starter:0");

        let (status, body) = send(&app, Some("Bearer pgw_lastcall")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(body.contains("quota_exhausted"));
    }
}
