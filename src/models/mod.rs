//! Data models and API request/response types.
//!
//! This module contains all data structures held in the in-memory stores
//! plus the JSON shapes exchanged with clients and upstreams.

/// Threshold alert rules
pub mod alert;
/// API key quota/expiry record
pub mod api_key;
/// Purchase orders and their API shapes
pub mod order;
/// Normalized payment-processor notification
pub mod payment;
/// Static plan catalog
pub mod plan;
/// Unified price quote
pub mod quote;
