//! HTTP gateway.
//!
//! Thin axum layer over [`ChatRoom`](crate::room::ChatRoom): parses query
//! strings and JSON bodies, maps `ChatError` to status codes, and serves
//! the browser client's static files.

pub mod http;

pub use http::{router, serve, GatewayState};
