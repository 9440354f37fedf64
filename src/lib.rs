//! Gateway bridge: serve push-style HTTP handlers over an event-stream gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   gateway transport                     adapter                        push-model app
//!  ───────────────────          ─────────────────────────────          ──────────────────
//!   scope ─────────────────────▶ http::request (start line,   ───────▶ Application::
//!                                headers)                               find_handler
//!   receive() ─ http.request ──▶ adapter (request pump) ─────────────▶ data_received /
//!             ─ http.disconnect▶   └─ close() ──────────────────────▶ close callback
//!                                                                       finish
//!   send() ◀─ http.response.* ── bridge::queue ◀── bridge::connection ◀ write_headers /
//!                                 (serial)          (framing)           write / finish
//! ```
//!
//! One `GatewayAdapter::call` handles one exchange and returns once the
//! request was consumed (or the client left) and the response is flushed.

pub mod adapter;
pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod observability;

pub use adapter::{ExchangeOutcome, GatewayAdapter};
pub use config::BridgeConfig;
pub use error::BridgeError;
