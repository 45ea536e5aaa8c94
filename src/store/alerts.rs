//! In-memory alert store.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::models::alert::Alert;

/// Alert repository keyed by alert id.
#[derive(Clone, Default)]
pub struct AlertStore {
    inner: Arc<DashMap<Uuid, Alert>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, alert: Alert) {
        self.inner.insert(alert.id, alert);
    }

    pub fn get(&self, id: &Uuid) -> Option<Alert> {
        self.inner.get(id).map(|entry| entry.value().clone())
    }

    pub fn list(&self) -> Vec<Alert> {
        self.inner.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Remove an alert; returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.inner.remove(id).is_some()
    }
}
