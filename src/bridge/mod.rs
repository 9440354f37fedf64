//! Connection bridge subsystem: the push-model connection over gateway `send`.
//!
//! # Data Flow
//! ```text
//! handler calls write_headers / write / finish   (connection.rs)
//!     → Job enqueued in call order               (queue.rs)
//!     → send task: EventSink::send, one at a time
//!     → finish's send done → CompletionSignal    (completion.rs)
//!
//! Inbound disconnect:
//!     adapter → HttpConnection::close → close callback → CompletionSignal
//! ```
//!
//! Bridge States:
//!     Open → Closing (finish queued) → Closed (completion resolved)
//!     Open | Closing → Closed (close / send failure)

pub mod completion;
pub mod connection;
pub mod queue;

pub use completion::{CompletionSignal, CompletionWaiter};
pub use connection::{BridgeState, ConnectionContext, ExchangeId, HttpConnection};
pub use queue::SendHandle;
