//! The two gateway primitives, `receive` and `send`.

use std::future::Future;

use thiserror::Error;

use crate::gateway::{InboundEvent, OutboundEvent};

/// Failures reported by the gateway transport.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The peer side of the transport went away.
    #[error("gateway endpoint closed")]
    Closed,

    /// The transport rejected an outbound event.
    #[error("send failed: {0}")]
    Send(String),

    /// The transport could not produce the next inbound event.
    #[error("receive failed: {0}")]
    Receive(String),
}

/// Source of inbound events for one exchange.
pub trait EventSource: Send {
    /// Await the next inbound event.
    fn receive(&mut self) -> impl Future<Output = Result<InboundEvent, GatewayError>> + Send;
}

/// Sink for outbound events.
///
/// The sink is owned by the exchange's send queue task, so it must be
/// shareable across tasks.
pub trait EventSink: Send + Sync + 'static {
    /// Await delivery of one outbound event.
    fn send(&self, event: OutboundEvent) -> impl Future<Output = Result<(), GatewayError>> + Send;
}
