//! Plan catalog endpoint.

use axum::Json;

use crate::models::plan::{CATALOG, Plan};

/// List the purchasable plans.
///
/// # Endpoint
///
/// `GET /api/v1/plans`
///
/// Public; this is what a client reads before purchasing an order.
pub async fn list_plans() -> Json<[Plan; 3]> {
    Json(CATALOG)
}
