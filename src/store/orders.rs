//! In-memory order store.
//!
//! Process-wide state with no external durability: every order lives in a
//! sharded concurrent map and is lost on restart. Orders are created by the
//! purchase endpoint, mutated only by the payment webhook, and never
//! deleted (a documented limitation of the design).

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::models::order::{Order, OrderStatus};

/// Outcome of an attempted pending → completed transition.
#[derive(Debug)]
pub enum Completion {
    /// The order transitioned; the returned record carries the minted key
    Completed(Order),

    /// The order had already completed; the existing record is returned
    /// untouched and no key was minted
    AlreadyCompleted(Order),

    /// No order with that id exists
    NotFound,
}

/// Order repository keyed by order id.
///
/// Cloning the store clones a handle to the same underlying map, matching
/// how the shared application state is passed into handlers.
#[derive(Clone, Default)]
pub struct OrderStore {
    inner: Arc<DashMap<Uuid, Order>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly created order.
    pub fn insert(&self, order: Order) {
        self.inner.insert(order.id, order);
    }

    /// Look up an order by id, returning a snapshot.
    pub fn find(&self, id: &Uuid) -> Option<Order> {
        self.inner.get(id).map(|entry| entry.value().clone())
    }

    /// Complete an order at most once, minting its key inside the critical
    /// section.
    ///
    /// The status check, the key minting via `mint`, and the mutation form
    /// a single step under the entry lock, so two concurrent confirming
    /// callbacks cannot both mint a key for the same order: the loser
    /// observes `AlreadyCompleted` and `mint` is never invoked for it.
    pub fn complete_with_key(
        &self,
        id: &Uuid,
        txid: Option<String>,
        mint: impl FnOnce(&Order) -> String,
    ) -> Completion {
        let Some(mut entry) = self.inner.get_mut(id) else {
            return Completion::NotFound;
        };

        if entry.status == OrderStatus::Completed {
            return Completion::AlreadyCompleted(entry.value().clone());
        }

        let api_key = mint(entry.value());
        entry.api_key = Some(api_key);
        entry.txid = txid;
        entry.status = OrderStatus::Completed;

        Completion::Completed(entry.value().clone())
    }

    /// Number of orders tracked since startup.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plan;
    use chrono::Utc;

    fn pending_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            plan: plan::resolve(Some("pro")),
            email: None,
            deposit_address: "ADDR1".to_string(),
            status: OrderStatus::Pending,
            api_key: None,
            txid: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_then_find_returns_snapshot() {
        let store = OrderStore::new();
        let order = pending_order();
        let id = order.id;

        store.insert(order);

        let found = store.find(&id).unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.status, OrderStatus::Pending);
        assert_eq!(found.deposit_address, "ADDR1");
    }

    #[test]
    fn find_unknown_order_is_none() {
        let store = OrderStore::new();
        assert!(store.find(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn completion_attaches_key_and_txid() {
        let store = OrderStore::new();
        let order = pending_order();
        let id = order.id;
        store.insert(order);

        let outcome =
            store.complete_with_key(&id, Some("tx1".to_string()), |_| "pgw_abc".to_string());

        match outcome {
            Completion::Completed(completed) => {
                assert_eq!(completed.status, OrderStatus::Completed);
                assert_eq!(completed.api_key.as_deref(), Some("pgw_abc"));
                assert_eq!(completed.txid.as_deref(), Some("tx1"));
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn second_completion_does_not_mint_again() {
        let store = OrderStore::new();
        let order = pending_order();
        let id = order.id;
        store.insert(order);

        store.complete_with_key(&id, Some("tx1".to_string()), |_| "pgw_first".to_string());

        let outcome = store.complete_with_key(&id, Some("tx2".to_string()), |_| {
            panic!("mint must not run for an already-completed order")
        });

        match outcome {
            Completion::AlreadyCompleted(existing) => {
                assert_eq!(existing.api_key.as_deref(), Some("pgw_first"));
                assert_eq!(existing.txid.as_deref(), Some("tx1"));
            }
            other => panic!("expected AlreadyCompleted, got {other:?}"),
        }
    }

    #[test]
    fn completing_unknown_order_is_not_found() {
        let store = OrderStore::new();
        let outcome = store.complete_with_key(&Uuid::new_v4(), None, |_| {
            panic!("mint must not run for an unknown order")
        });
        assert!(matches!(outcome, Completion::NotFound));
    }
}
