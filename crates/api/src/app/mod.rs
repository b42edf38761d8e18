//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: composition root (repositories -> services)
//! - `use_cases/`: one service per module
//! - `routes/`: HTTP routes + handlers (one file per module)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: response envelope and error mapping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod use_cases;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
