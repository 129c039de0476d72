//! HTTP API: request handlers, routing, and request/response mapping.

pub mod app;
pub mod middleware;
