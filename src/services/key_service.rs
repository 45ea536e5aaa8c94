//! API key minting.
//!
//! Tokens are capability credentials: 32 bytes from a cryptographically
//! strong source, hex-encoded behind a recognizable prefix so they can be
//! told apart from other token kinds in logs. Minting cannot fail; given a
//! plan it always produces a fresh record in the key store.

use chrono::{Duration, Utc};

use crate::models::api_key::ApiKeyRecord;
use crate::models::plan::Plan;
use crate::store::keys::KeyStore;

/// Prefix identifying gateway API keys.
pub const KEY_PREFIX: &str = "pgw_";

/// Validity window of a freshly minted key.
pub const KEY_VALIDITY_DAYS: i64 = 30;

/// Mint a new API key for a confirmed purchase.
///
/// # Process
///
/// 1. Generate a prefixed high-entropy token
/// 2. Insert a key record carrying the plan's full call quota, the
///    order's contact email, and an expiry 30 days out
/// 3. Return the token to the caller (the webhook confirmation path)
pub fn mint_key(keys: &KeyStore, plan: &'static Plan, email: Option<String>) -> String {
    let token = generate_token();
    let now = Utc::now();

    keys.insert(
        token.clone(),
        ApiKeyRecord {
            plan_id: plan.id,
            calls_remaining: plan.call_quota,
            email,
            issued_at: now,
            expires_at: now + Duration::days(KEY_VALIDITY_DAYS),
        },
    );

    token
}

/// Generate a prefixed token from 32 random bytes (64 hex characters).
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    format!("{KEY_PREFIX}{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plan;

    #[test]
    fn minted_token_has_prefix_and_entropy_length() {
        let keys = KeyStore::new();
        let token = mint_key(&keys, plan::resolve(Some("pro")), None);

        assert!(token.starts_with(KEY_PREFIX));
        assert_eq!(token.len(), KEY_PREFIX.len() + 64);
    }

    #[test]
    fn minted_record_carries_plan_quota_and_expiry() {
        let keys = KeyStore::new();
        let before = Utc::now();
        let token = mint_key(
            &keys,
            plan::resolve(Some("pro")),
            Some("dev@example.com".to_string()),
        );

        let record = keys.get(&token).unwrap();
        assert_eq!(record.plan_id, "pro");
        assert_eq!(record.calls_remaining, 10_000);
        assert_eq!(record.email.as_deref(), Some("dev@example.com"));

        let validity = record.expires_at - record.issued_at;
        assert_eq!(validity, Duration::days(KEY_VALIDITY_DAYS));
        assert!(record.issued_at >= before);
    }

    #[test]
    fn tokens_are_unique() {
        let keys = KeyStore::new();
        let plan = plan::resolve(None);
        let a = mint_key(&keys, plan, None);
        let b = mint_key(&keys, plan, None);

        assert_ne!(a, b);
        assert_eq!(keys.len(), 2);
    }
}
