//! HTTP metadata translation between the two connection models.
//!
//! # Data Flow
//! ```text
//! Scope (gateway)
//!     → request.rs (target path, RequestStartLine, HeaderMap)
//!     → push-model handler
//!
//! ResponseStartLine + HeaderMap (push model)
//!     → response.rs (deny-list, lower-cased byte pairs)
//!     → OutboundEvent::ResponseStart
//! ```
//!
//! # Design Decisions
//! - Pure functions: no I/O, no state
//! - Malformed scopes fail fast, nothing is repaired
//! - Headers the transport owns (date, server) never leave the adapter

pub mod request;
pub mod response;
pub mod start_line;

pub use response::HeaderDenyList;
pub use start_line::{RequestStartLine, ResponseStartLine, StartLine};
