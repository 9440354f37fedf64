//! Gateway protocol subsystem.
//!
//! # Data Flow
//! ```text
//! gateway transport
//!     → scope.rs (exchange metadata, validated once)
//!     → transport.rs: EventSource::receive → InboundEvent (event.rs)
//!     ← transport.rs: EventSink::send     ← OutboundEvent (event.rs)
//! ```
//!
//! # Design Decisions
//! - Events are plain enums; the wire `type` tag lives only in serde attributes
//! - The transport is consumed through two narrow traits, never a concrete socket
//! - channel.rs provides an in-memory transport for tests and replays

pub mod channel;
pub mod event;
pub mod scope;
pub mod transport;

pub use event::{HeaderPair, InboundEvent, OutboundEvent};
pub use scope::Scope;
pub use transport::{EventSink, EventSource, GatewayError};
