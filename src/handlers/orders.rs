//! Plan purchase HTTP handlers.
//!
//! This module implements the order-related API endpoints:
//! - POST /api/v1/orders - Purchase a plan (creates an order)
//! - GET /api/v1/orders/:id - Poll order status, retrieve the key

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{
    CreateOrderRequest, CreateOrderResponse, DepositInstructions, Order, OrderStatus,
    OrderStatusResponse,
};
use crate::models::plan;
use crate::state::AppState;

/// Purchase a plan.
///
/// # Endpoint
///
/// `POST /api/v1/orders`
///
/// # Request Body
///
/// ```json
/// {
///   "plan": "pro",
///   "email": "dev@example.com"
/// }
/// ```
///
/// An absent or unrecognized plan selector silently buys the lowest tier.
///
/// # Response
///
/// - **Success (201 Created)**: order id plus deposit instructions
/// - **Error (503)**: the payment processor could not hand out a deposit
///   address; retry later, nothing was stored
///
/// ```json
/// {
///   "order_id": "550e8400-e29b-41d4-a716-446655440000",
///   "status": "pending",
///   "plan": { "id": "pro", "name": "Pro", "price_usd": 15.0, "call_quota": 10000 },
///   "payment": {
///     "address": "ltc1q...",
///     "amount_usd": 15.0,
///     "asset": "ltc"
///   }
/// }
/// ```
///
/// # Process
///
/// 1. Resolve the plan from the static catalog
/// 2. Generate a fresh order id
/// 3. Ask the processor for a one-time deposit address whose callback URL
///    embeds the order id
/// 4. Only then store the pending order: a processor failure leaves no
///    partial state behind
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let plan = plan::resolve(request.plan.as_deref());
    let order_id = Uuid::new_v4();

    let deposit = state.processor.create_deposit_address(order_id).await?;

    let order = Order {
        id: order_id,
        plan,
        email: request.email,
        deposit_address: deposit.address.clone(),
        status: OrderStatus::Pending,
        api_key: None,
        txid: None,
        created_at: Utc::now(),
    };
    state.orders.insert(order);

    tracing::info!(%order_id, plan = plan.id, "order created, awaiting payment");

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id,
            status: OrderStatus::Pending,
            plan,
            payment: DepositInstructions {
                address: deposit.address,
                amount_usd: plan.price_usd,
                asset: state.config.payment_ticker.clone(),
                minimum_coin: deposit.minimum_coin,
            },
        }),
    ))
}

/// Poll an order's status.
///
/// # Endpoint
///
/// `GET /api/v1/orders/:id`
///
/// # Response
///
/// - **Success (200 OK)**: pending orders repeat the deposit
///   instructions; completed orders carry the minted API key and a usage
///   instruction
/// - **Error (404)**: unknown order id
///
/// Safe to poll repeatedly; reading status has no side effects.
pub async fn order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderStatusResponse>, AppError> {
    let order = state
        .orders
        .find(&order_id)
        .ok_or(AppError::OrderNotFound)?;

    Ok(Json(order.into()))
}
