//! API key record for paid access.
//!
//! Keys are capability tokens: the token string itself is the lookup key in
//! the key store, and holding it is what grants access. Records track the
//! remaining call quota and an expiry timestamp; a key is rejected once it
//! is past expiry regardless of remaining quota, and once its quota reaches
//! zero regardless of expiry.

use chrono::{DateTime, Utc};

/// State attached to an issued API key.
#[derive(Debug, Clone)]
pub struct ApiKeyRecord {
    /// Catalog id of the plan this key was purchased under
    pub plan_id: &'static str,

    /// Remaining authenticated calls
    ///
    /// Decremented by exactly one per accepted request; monotonically
    /// non-increasing over the key's lifetime.
    pub calls_remaining: i64,

    /// Contact email carried over from the originating order
    pub email: Option<String>,

    /// When the key was minted
    pub issued_at: DateTime<Utc>,

    /// When the key stops being accepted, independent of remaining quota
    pub expires_at: DateTime<Utc>,
}
