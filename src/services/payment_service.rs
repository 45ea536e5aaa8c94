//! Payment processor client and payment-confirmation logic.
//!
//! Two halves live here:
//!
//! - `PaymentProcessor`: the outbound "create deposit address" call made
//!   during order creation. This is the only network I/O in the purchase
//!   workflow and it is time-bounded.
//! - `apply_notification`: the pure confirmation step driven by the
//!   processor's webhook. It touches only the in-memory stores and
//!   reports its outcome; the handler owns the ack-always policy.

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::order::OrderStatus;
use crate::models::payment::PaymentNotification;
use crate::services::key_service;
use crate::store::keys::KeyStore;
use crate::store::orders::{Completion, OrderStore};

/// How long the deposit-address call may take before the order request
/// fails as retryable.
const PROCESSOR_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Path the processor calls back to, registered with every deposit address.
const CALLBACK_PATH: &str = "/api/v1/payments/callback";

/// Deposit instructions returned by the processor.
#[derive(Debug)]
pub struct DepositAddress {
    /// One-time address assigned to this order
    pub address: String,

    /// Smallest transaction the processor will forward
    pub minimum_coin: Option<f64>,
}

/// Wire shape of the processor's create-address response.
#[derive(Debug, Deserialize)]
struct CreateAddressResponse {
    status: String,
    address_in: Option<String>,
    minimum_transaction_coin: Option<f64>,
}

/// Client for the external crypto payment processor.
pub struct PaymentProcessor {
    base_url: String,
    ticker: String,
    payout_address: String,
    callback_base: Url,
    client: reqwest::Client,
}

impl PaymentProcessor {
    /// Build the client from configuration.
    ///
    /// The callback URL is derived from `PUBLIC_URL` once at startup so a
    /// misconfigured base fails the boot instead of the first purchase.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let public = Url::parse(&config.public_url)?;
        let callback_base = public.join(CALLBACK_PATH)?;

        let client = reqwest::Client::builder()
            .timeout(PROCESSOR_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: config.payment_api_base.trim_end_matches('/').to_string(),
            ticker: config.payment_ticker.clone(),
            payout_address: config.payout_address.clone(),
            callback_base,
            client,
        })
    }

    /// The callback URL registered for a given order.
    ///
    /// The order id rides along as a query parameter; it is the only
    /// piece of state the processor is guaranteed to echo back.
    pub fn callback_url(&self, order_id: Uuid) -> Url {
        let mut url = self.callback_base.clone();
        url.query_pairs_mut()
            .append_pair("order_id", &order_id.to_string());
        url
    }

    /// Request a one-time deposit address for an order.
    ///
    /// # Process
    ///
    /// 1. Call the processor's create endpoint for the configured
    ///    settlement ticker, forwarding funds to the payout wallet
    /// 2. Register the per-order callback URL and ask for
    ///    pending-transaction callbacks as well
    /// 3. Treat anything but an explicit success as retryable
    ///    unavailability (no order state exists yet at this point)
    pub async fn create_deposit_address(
        &self,
        order_id: Uuid,
    ) -> Result<DepositAddress, AppError> {
        let endpoint = format!("{}/{}/create/", self.base_url, self.ticker);
        let callback = self.callback_url(order_id);

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("address", self.payout_address.as_str()),
                ("callback", callback.as_str()),
                ("pending", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::PaymentProcessorUnavailable(format!(
                    "deposit address request failed: {e}"
                ))
            })?;

        if !response.status().is_success() {
            return Err(AppError::PaymentProcessorUnavailable(format!(
                "processor returned HTTP {}",
                response.status()
            )));
        }

        let body: CreateAddressResponse = response.json().await.map_err(|e| {
            AppError::PaymentProcessorUnavailable(format!("unreadable processor response: {e}"))
        })?;

        if body.status != "success" {
            return Err(AppError::PaymentProcessorUnavailable(format!(
                "processor status \"{}\"",
                body.status
            )));
        }

        let address = body.address_in.ok_or_else(|| {
            AppError::PaymentProcessorUnavailable(
                "processor response missing deposit address".to_string(),
            )
        })?;

        Ok(DepositAddress {
            address,
            minimum_coin: body.minimum_transaction_coin,
        })
    }
}

/// What a webhook notification did to the stores.
///
/// Every variant is acknowledged identically to the processor; the
/// distinction exists for logging and tests.
#[derive(Debug, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// No usable order id in the notification
    MissingOrderId,

    /// Order id not present in the store; acknowledged without side effect
    /// so the processor does not retry forever
    UnknownOrder,

    /// Order already completed; repeat callbacks are no-ops
    AlreadyCompleted,

    /// Transaction still has pending confirmations
    AwaitingConfirmations,

    /// Fully confirmed but the received amount is below the tolerance band
    InsufficientAmount,

    /// Payment confirmed: key minted and attached, order completed
    Confirmed { order_id: Uuid },
}

/// Apply a normalized payment notification to the stores.
///
/// Confirmation requires both conditions:
/// - the pending-confirmation counter is zero, and
/// - the received amount reaches `tolerance` of the plan's nominal price
///   (the band absorbs exchange-rate slippage between order creation and
///   settlement).
///
/// Anything short of that leaves the order pending and is not an error.
/// Key minting happens inside the order store's completion step, so even
/// racing confirmations mint at most one key per order.
pub fn apply_notification(
    orders: &OrderStore,
    keys: &KeyStore,
    tolerance: f64,
    note: &PaymentNotification,
) -> NotificationOutcome {
    let Some(order_id) = note.order_id else {
        return NotificationOutcome::MissingOrderId;
    };

    let Some(order) = orders.find(&order_id) else {
        return NotificationOutcome::UnknownOrder;
    };

    if order.status == OrderStatus::Completed {
        return NotificationOutcome::AlreadyCompleted;
    }

    // A missing counter is treated as still-confirming, never as confirmed.
    if note.pending.unwrap_or(i64::MAX) != 0 {
        return NotificationOutcome::AwaitingConfirmations;
    }

    let received = note.value_coin.unwrap_or(0.0);
    if received < order.plan.price_usd * tolerance {
        return NotificationOutcome::InsufficientAmount;
    }

    match orders.complete_with_key(&order_id, note.txid.clone(), |order| {
        key_service::mint_key(keys, order.plan, order.email.clone())
    }) {
        Completion::Completed(_) => NotificationOutcome::Confirmed { order_id },
        Completion::AlreadyCompleted(_) => NotificationOutcome::AlreadyCompleted,
        Completion::NotFound => NotificationOutcome::UnknownOrder,
    }
}
