use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::app::Outcome;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Copy, Clone)]
pub struct RequestTimeout(pub Duration);

/// Per-request span, request id, latency logging and timeout.
///
/// A request that exceeds the timeout is answered with an internal error. Its
/// handler future is dropped, which drops any open store transaction and so
/// rolls it back.
pub async fn request_context(
    State(RequestTimeout(timeout)): State<RequestTimeout>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!(
        "request",
        %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let started = Instant::now();

    let mut response = match tokio::time::timeout(timeout, next.run(req))
        .instrument(span.clone())
        .await
    {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(parent: &span, timeout_ms = timeout.as_millis() as u64, "request timed out");
            Outcome::internal().into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    tracing::info!(
        parent: &span,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
