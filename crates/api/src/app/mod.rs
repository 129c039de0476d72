//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: which record store backs the stock engine
//! - `handlers.rs`: framework-agnostic request handlers returning `Outcome`s
//! - `outcome.rs`: status kinds and JSON payloads
//! - `routes/`: HTTP routes (axum extractors → handlers)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent responses for rejected requests

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use vending_infra::{Settings, StoreError};

use crate::middleware::{self, RequestTimeout};

pub mod dto;
pub mod errors;
pub mod handlers;
pub mod outcome;
pub mod routes;
pub mod services;

pub use outcome::{Outcome, StatusKind};
pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(settings: &Settings) -> Result<Router, StoreError> {
    let services = services::build_services(settings).await?;
    Ok(router_with(Arc::new(services), settings.request_timeout))
}

/// Build the router over already-wired services.
pub fn router_with(services: Arc<AppServices>, request_timeout: Duration) -> Router {
    with_request_layers(
        routes::router()
            .fallback(errors::route_not_found)
            .layer(Extension(services)),
        request_timeout,
    )
}

fn with_request_layers(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(errors::panic_response))
            .layer(axum::middleware::from_fn_with_state(
                RequestTimeout(request_timeout),
                middleware::request_context,
            )),
    )
}
