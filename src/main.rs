//! Price Gateway - Main Application Entry Point
//!
//! This is a REST API server that aggregates public price-data APIs
//! (crypto, stock, forex) behind one surface and sells access to it:
//! clients purchase a plan, pay through an external crypto payment
//! processor, and receive a quota-limited API key once the payment
//! confirms.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **State**: in-memory stores for orders, keys, alerts and the price
//!   cache, all volatile and reset on restart
//! - **Authentication**: bearer API keys with per-call quota decrement
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build shared application state (stores + HTTP clients)
//! 3. Build HTTP router with public routes and the key-gated group
//! 4. Start server on configured port

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;
mod store;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    let server_port = config.server_port;
    tracing::info!("Configuration loaded");

    // Build shared state: stores, payment processor client, upstream client
    let state = state::AppState::new(config)?;
    tracing::info!("Application state initialized");

    // Quota-consuming routes (price data and alerts)
    let gated_routes = Router::new()
        // Price routes
        .route(
            "/api/v1/prices/crypto/{symbol}",
            get(handlers::prices::crypto_price),
        )
        .route(
            "/api/v1/prices/stock/{symbol}",
            get(handlers::prices::stock_price),
        )
        .route(
            "/api/v1/prices/forex/{base}/{quote}",
            get(handlers::prices::forex_rate),
        )
        // Alert routes
        .route("/api/v1/alerts", post(handlers::alerts::create_alert))
        .route("/api/v1/alerts", get(handlers::alerts::list_alerts))
        .route("/api/v1/alerts/{id}", get(handlers::alerts::evaluate_alert))
        .route("/api/v1/alerts/{id}", delete(handlers::alerts::delete_alert))
        // Apply the key validation gate to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Combine gated routes with public routes
    let app = Router::new()
        // Public routes (no key required)
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/plans", get(handlers::plans::list_plans))
        .route("/api/v1/orders", post(handlers::orders::create_order))
        .route("/api/v1/orders/{id}", get(handlers::orders::order_status))
        // The payment processor callback is method-agnostic
        .route(
            "/api/v1/payments/callback",
            get(handlers::payments::payment_callback).post(handlers::payments::payment_callback),
        )
        // Merge gated routes
        .merge(gated_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share application state with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
