//! In-memory API key store.
//!
//! Maps issued key tokens to their quota/expiry state. Like the order
//! store this is process memory only: issued keys do not survive a
//! restart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::models::api_key::ApiKeyRecord;

/// Why a presented key was rejected.
///
/// Expiry and exhaustion are deliberately distinct: an expired key is an
/// authentication failure, an exhausted key is a rate-limit condition, and
/// clients are told which one they hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAccessError {
    /// Token not present in the store
    Unknown,

    /// Token found but past its expiry timestamp
    Expired,

    /// Token found and current, but no calls remaining
    Exhausted,
}

/// Key repository keyed by the token string itself.
#[derive(Clone, Default)]
pub struct KeyStore {
    inner: Arc<DashMap<String, ApiKeyRecord>>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly minted key record.
    pub fn insert(&self, token: String, record: ApiKeyRecord) {
        self.inner.insert(token, record);
    }

    /// Look up a key without touching its quota.
    pub fn get(&self, token: &str) -> Option<ApiKeyRecord> {
        self.inner.get(token).map(|entry| entry.value().clone())
    }

    /// Authorize one call against a key, consuming one unit of quota.
    ///
    /// The eligibility checks and the decrement happen under the entry
    /// lock as a single step: concurrent requests presenting the same key
    /// each consume exactly one call and cannot race the final unit.
    ///
    /// Check order matters: expiry is tested before exhaustion, so an
    /// expired key reports `Expired` regardless of remaining quota.
    /// Rejections do not mutate the record.
    pub fn consume(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ApiKeyRecord, KeyAccessError> {
        let Some(mut entry) = self.inner.get_mut(token) else {
            return Err(KeyAccessError::Unknown);
        };

        if now > entry.expires_at {
            return Err(KeyAccessError::Expired);
        }
        if entry.calls_remaining <= 0 {
            return Err(KeyAccessError::Exhausted);
        }

        entry.calls_remaining -= 1;
        Ok(entry.value().clone())
    }

    /// Number of keys issued since startup.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
