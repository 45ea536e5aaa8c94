//! Request-intercepting middleware.
/// API key validation gate
pub mod auth;
