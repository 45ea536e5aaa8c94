//! Business logic services.
//!
//! Handlers stay thin; the work that involves upstream calls or multi-step
//! store mutations lives here.

/// API key minting
pub mod key_service;
/// Payment processor client and confirmation logic
pub mod payment_service;
/// Upstream price fetching with caching
pub mod quote_service;
