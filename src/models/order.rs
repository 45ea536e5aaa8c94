//! Order data models and API request/response types.
//!
//! This module defines:
//! - `Order`: in-memory record of an intent to purchase a plan
//! - `CreateOrderRequest`: body of the plan-purchase endpoint
//! - `CreateOrderResponse` / `OrderStatusResponse`: bodies returned to clients
//!
//! An order is created when a client requests a plan and a deposit address
//! has been obtained from the payment processor. It stays `pending` until
//! the processor's webhook confirms payment, at which point the minted API
//! key and the on-chain transaction id are attached and the status becomes
//! `completed`. Orders transition pending → completed at most once and are
//! never deleted for the life of the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::plan::Plan;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Waiting for the payment processor to confirm payment
    Pending,

    /// Payment confirmed, API key minted and attached
    Completed,
}

/// Record of an intent to purchase a plan.
#[derive(Debug, Clone)]
pub struct Order {
    /// Opaque order identifier, generated per creation request
    pub id: Uuid,

    /// Purchased plan from the static catalog
    pub plan: &'static Plan,

    /// Optional contact email supplied by the buyer
    pub email: Option<String>,

    /// One-time deposit address assigned by the payment processor
    pub deposit_address: String,

    /// Current lifecycle status
    ///
    /// Mutated only by the payment webhook handler, and only in the
    /// pending → completed direction.
    pub status: OrderStatus,

    /// API key minted on confirmation
    ///
    /// `None` while pending. Set exactly once, together with `txid`.
    pub api_key: Option<String>,

    /// Transaction id reported by the payment processor on confirmation
    pub txid: Option<String>,

    /// When this order was created
    pub created_at: DateTime<Utc>,
}

/// Request to purchase a plan.
///
/// # JSON Example
///
/// ```json
/// {
///   "plan": "pro",
///   "email": "dev@example.com"
/// }
/// ```
///
/// Both fields are optional: an absent or unrecognized `plan` selects the
/// lowest tier, and `email` is only used as a contact for the issued key.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Plan selector (catalog id); lowest tier if absent or unrecognized
    pub plan: Option<String>,

    /// Optional contact email attached to the order and the minted key
    pub email: Option<String>,
}

/// Deposit instructions returned when an order is created.
///
/// # JSON Example
///
/// ```json
/// {
///   "address": "ltc1q...",
///   "amount_usd": 15.0,
///   "asset": "ltc",
///   "minimum_coin": 0.0005
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct DepositInstructions {
    /// One-time deposit address to send funds to
    pub address: String,

    /// Required amount, denominated in the reference currency
    pub amount_usd: f64,

    /// Settlement asset/network label (processor ticker, e.g. "ltc")
    pub asset: String,

    /// Minimum transaction size hint reported by the processor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_coin: Option<f64>,
}

/// Response returned when an order is created.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub plan: &'static Plan,
    pub payment: DepositInstructions,
}

/// Response returned by the order status endpoint.
///
/// The shape depends on the order's lifecycle stage:
///
/// - **pending**: includes `deposit_address` and `price_usd` so the client
///   can keep showing payment instructions while polling
/// - **completed**: includes the minted `api_key` and a usage instruction
///
/// # JSON Example (completed)
///
/// ```json
/// {
///   "order_id": "550e8400-e29b-41d4-a716-446655440000",
///   "status": "completed",
///   "plan": { "id": "pro", "name": "Pro", "price_usd": 15.0, "call_quota": 10000 },
///   "api_key": "pgw_a1b2c3...",
///   "usage": "Send the key on each request as: Authorization: Bearer <key>"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub plan: &'static Plan,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
}

/// How clients are told to present an issued key.
const KEY_USAGE_HINT: &str = "Send the key on each request as: Authorization: Bearer <key>";

impl From<Order> for OrderStatusResponse {
    fn from(order: Order) -> Self {
        match order.status {
            OrderStatus::Completed => Self {
                order_id: order.id,
                status: order.status,
                plan: order.plan,
                api_key: order.api_key,
                usage: Some(KEY_USAGE_HINT),
                deposit_address: None,
                price_usd: None,
            },
            OrderStatus::Pending => Self {
                order_id: order.id,
                status: order.status,
                plan: order.plan,
                api_key: None,
                usage: None,
                deposit_address: Some(order.deposit_address),
                price_usd: Some(order.plan.price_usd),
            },
        }
    }
}
