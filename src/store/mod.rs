//! Owned in-memory store abstractions.
//!
//! All shared mutable state lives behind the narrow interfaces in this
//! module. Each store wraps a sharded concurrent map, so the
//! read-modify-write sequences that matter (the key store's
//! check-then-decrement, the order store's check-then-complete) are atomic
//! per entry. Nothing here is durable: every table resets on restart.

/// Threshold alert rules
pub mod alerts;
/// Short-lived price cache
pub mod cache;
/// Issued API keys
pub mod keys;
/// Purchase orders
pub mod orders;
