//! Consistent error responses for requests axum rejects before a handler runs.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};

use crate::app::outcome::Outcome;

pub fn json_rejection(err: JsonRejection) -> Outcome {
    tracing::debug!(error = %err, "request body rejected");
    Outcome::validation(format!("Invalid request body: {}", err.body_text()))
}

pub fn path_rejection(err: PathRejection) -> Outcome {
    tracing::debug!(error = %err, "request path rejected");
    Outcome::validation("Invalid identifier in path")
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> Outcome {
    Outcome::not_found("Route not found")
}

/// Response for a handler that panicked; the process keeps serving.
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    Outcome::internal().into_response()
}
