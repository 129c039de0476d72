//! Handler outcomes: a status kind plus a JSON payload.
//!
//! Success bodies carry `message`; error bodies carry `error` (a stable code)
//! and `message`. List endpoints return bare JSON arrays.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use vending_core::DomainError;
use vending_infra::EngineError;

/// Message returned for any failure the caller cannot act on.
pub const INTERNAL_MESSAGE: &str = "internal error";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Created,
    Ok,
    ValidationError,
    NotFound,
    InvalidQuantity,
    InsufficientStock,
    InternalError,
}

impl StatusKind {
    pub fn http_status(self) -> StatusCode {
        match self {
            StatusKind::Created => StatusCode::CREATED,
            StatusKind::Ok => StatusCode::OK,
            StatusKind::ValidationError
            | StatusKind::InvalidQuantity
            | StatusKind::InsufficientStock => StatusCode::BAD_REQUEST,
            StatusKind::NotFound => StatusCode::NOT_FOUND,
            StatusKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code, `None` for success kinds.
    pub fn code(self) -> Option<&'static str> {
        match self {
            StatusKind::Created | StatusKind::Ok => None,
            StatusKind::ValidationError => Some("validation_error"),
            StatusKind::NotFound => Some("not_found"),
            StatusKind::InvalidQuantity => Some("invalid_quantity"),
            StatusKind::InsufficientStock => Some("insufficient_stock"),
            StatusKind::InternalError => Some("internal_error"),
        }
    }

    pub fn is_success(self) -> bool {
        self.code().is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: StatusKind,
    pub body: Value,
}

impl Outcome {
    pub fn new(status: StatusKind, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(message: &str) -> Self {
        Self::new(StatusKind::Ok, json!({ "message": message }))
    }

    pub fn created(message: &str, id: impl Serialize) -> Self {
        Self::new(StatusKind::Created, json!({ "message": message, "id": id }))
    }

    pub fn list<T: Serialize>(rows: Vec<T>) -> Self {
        match serde_json::to_value(rows) {
            Ok(body) => Self::new(StatusKind::Ok, body),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                Self::internal()
            }
        }
    }

    pub fn error(status: StatusKind, message: impl Into<String>) -> Self {
        let code = status.code().unwrap_or("error");
        Self::new(status, json!({ "error": code, "message": message.into() }))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::error(StatusKind::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(StatusKind::NotFound, message)
    }

    pub fn internal() -> Self {
        Self::error(StatusKind::InternalError, INTERNAL_MESSAGE)
    }

    pub fn from_domain(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::validation(capitalize(&msg)),
            DomainError::NotFound(what) => Self::not_found(format!("{} not found", capitalize(&what))),
            DomainError::InvalidQuantity(msg) => {
                Self::error(StatusKind::InvalidQuantity, capitalize(&msg))
            }
            DomainError::InsufficientStock { available, requested } => Self::new(
                StatusKind::InsufficientStock,
                json!({
                    "error": "insufficient_stock",
                    "message": "Not enough items in stock",
                    "available": available,
                    "requested": requested,
                }),
            ),
        }
    }

    /// Store failures are logged and answered with a generic message only.
    pub fn from_engine(err: EngineError) -> Self {
        match err {
            EngineError::Domain(e) => Self::from_domain(e),
            EngineError::Store(e) => {
                tracing::error!(error = %e, "record store failure");
                Self::internal()
            }
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

impl From<EngineError> for Outcome {
    fn from(err: EngineError) -> Self {
        Self::from_engine(err)
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        (self.status.http_status(), Json(self.body)).into_response()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
