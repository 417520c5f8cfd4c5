//! # api-adapters
//!
//! The delivery layer for cityboard: the real-time push hub and, behind the
//! `web-axum` feature, the REST and websocket routes.

pub mod push;
#[cfg(feature = "web-axum")]
pub mod web;

pub use push::PushHub;
