//! Payment processor webhook handler.
//!
//! The processor reports payment progress by calling back to a fixed path.
//! It is method-agnostic and transport-sloppy: fields arrive via the query
//! string, a form body, a JSON body, or a mix, and the same callback can
//! fire many times while a transaction confirms. The handler normalizes
//! whatever arrived, applies it to the stores, and acknowledges success
//! unconditionally; any other response would make the processor retry
//! forever.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
};

use crate::models::payment::PaymentNotification;
use crate::services::payment_service::{self, NotificationOutcome};
use crate::state::AppState;

/// Acknowledgment body the processor expects on every callback.
const PROCESSOR_ACK: &str = "*ok*";

/// Handle a payment notification callback.
///
/// # Endpoint
///
/// `GET | POST /api/v1/payments/callback?order_id=<uuid>`
///
/// # Response
///
/// Always `200 OK` with the acknowledgment body, whatever happened
/// internally. Unknown orders, repeat confirmations, partial payments and
/// internal faults are logged, never surfaced: the processor's retry
/// semantics depend on seeing success.
///
/// The raw query string is read directly (instead of a typed extractor)
/// so that even a malformed callback cannot be rejected before this
/// handler runs.
pub async fn payment_callback(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> &'static str {
    let note = PaymentNotification::from_transport(query.as_deref(), &body);

    let outcome = payment_service::apply_notification(
        &state.orders,
        &state.keys,
        state.config.confirmation_tolerance,
        &note,
    );

    match outcome {
        NotificationOutcome::Confirmed { order_id } => {
            tracing::info!(%order_id, "payment confirmed, API key issued");
        }
        NotificationOutcome::AwaitingConfirmations => {
            tracing::debug!(order_id = ?note.order_id, pending = ?note.pending, "payment still confirming");
        }
        NotificationOutcome::InsufficientAmount => {
            tracing::warn!(
                order_id = ?note.order_id,
                value_coin = ?note.value_coin,
                "confirmed payment below tolerance band, order stays pending"
            );
        }
        NotificationOutcome::AlreadyCompleted => {
            tracing::debug!(order_id = ?note.order_id, "repeat callback for completed order");
        }
        NotificationOutcome::UnknownOrder => {
            tracing::warn!(order_id = ?note.order_id, "callback for unknown order");
        }
        NotificationOutcome::MissingOrderId => {
            tracing::warn!("callback without usable order id");
        }
    }

    PROCESSOR_ACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{Order, OrderStatus};
    use crate::models::plan;
    use chrono::Utc;
    use uuid::Uuid;

    fn pending_pro_order(state: &AppState) -> Uuid {
        let order = Order {
            id: Uuid::new_v4(),
            plan: plan::resolve(Some("pro")),
            email: None,
            deposit_address: "ADDR1".to_string(),
            status: OrderStatus::Pending,
            api_key: None,
            txid: None,
            created_at: Utc::now(),
        };
        let id = order.id;
        state.orders.insert(order);
        id
    }

    #[tokio::test]
    async fn confirming_callback_completes_order_via_query_string() {
        let state = AppState::for_tests();
        let id = pending_pro_order(&state);

        let query = format!("order_id={id}&value_coin=14.3&pending=0&txid_in=tx1");
        let ack =
            payment_callback(State(state.clone()), RawQuery(Some(query)), Bytes::new()).await;

        assert_eq!(ack, PROCESSOR_ACK);
        let order = state.orders.find(&id).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.api_key.unwrap().starts_with("pgw_"));
    }

    #[tokio::test]
    async fn confirming_callback_completes_order_via_body() {
        let state = AppState::for_tests();
        let id = pending_pro_order(&state);

        let query = format!("order_id={id}");
        let body = Bytes::from_static(br#"{"value_coin":15.0,"pending":0,"txid_in":"tx2"}"#);
        let ack = payment_callback(State(state.clone()), RawQuery(Some(query)), body).await;

        assert_eq!(ack, PROCESSOR_ACK);
        assert_eq!(
            state.orders.find(&id).unwrap().status,
            OrderStatus::Completed
        );
    }

    #[tokio::test]
    async fn unknown_order_is_acknowledged_without_side_effects() {
        let state = AppState::for_tests();

        let query = format!("order_id={}&value_coin=15&pending=0", Uuid::new_v4());
        let ack = payment_callback(State(state.clone()), RawQuery(Some(query)), Bytes::new()).await;

        assert_eq!(ack, PROCESSOR_ACK);
        assert_eq!(state.orders.len(), 0);
        assert_eq!(state.keys.len(), 0);
    }

    #[tokio::test]
    async fn garbage_callback_is_still_acknowledged() {
        let state = AppState::for_tests();

        let ack = payment_callback(
            State(state.clone()),
            RawQuery(None),
            Bytes::from_static(b"\xff\xfe garbage"),
        )
        .await;

        assert_eq!(ack, PROCESSOR_ACK);
        assert_eq!(state.keys.len(), 0);
    }

    #[tokio::test]
    async fn repeat_callback_keeps_first_key() {
        let state = AppState::for_tests();
        let id = pending_pro_order(&state);

        let first = format!("order_id={id}&value_coin=14.3&pending=0&txid_in=tx1");
        payment_callback(State(state.clone()), RawQuery(Some(first)), Bytes::new()).await;
        let minted = state.orders.find(&id).unwrap().api_key;

        let second = format!("order_id={id}&value_coin=15&pending=0&txid_in=tx2");
        let ack =
            payment_callback(State(state.clone()), RawQuery(Some(second)), Bytes::new()).await;

        assert_eq!(ack, PROCESSOR_ACK);
        assert_eq!(state.orders.find(&id).unwrap().api_key, minted);
        assert_eq!(state.keys.len(), 1);
    }

    #[tokio::test]
    async fn still_confirming_callback_leaves_order_pending() {
        let state = AppState::for_tests();
        let id = pending_pro_order(&state);

        let query = format!("order_id={id}&value_coin=15&pending=1");
        payment_callback(State(state.clone()), RawQuery(Some(query)), Bytes::new()).await;

        assert_eq!(state.orders.find(&id).unwrap().status, OrderStatus::Pending);
        assert_eq!(state.keys.len(), 0);
    }
}
