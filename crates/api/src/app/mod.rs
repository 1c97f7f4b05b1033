//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: persistence wiring (post store selection)
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: the error taxonomy shared by every handler

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// `services` is constructed once at startup and shared by every request.
pub fn build_app(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(Arc::new(services)))
}
