//! Adapter-level error definitions.

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors raised while bridging one exchange.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The scope describes something other than an HTTP exchange.
    #[error("unsupported scope type: {0} (only http exchanges are supported)")]
    UnsupportedScope(String),

    /// The scope is missing required fields or carries undecodable bytes.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// `write_headers` was handed a request start line.
    #[error("write_headers requires a response start line, got a request start line")]
    RequestStartLine,

    /// A header name or value could not be represented.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The response start was already emitted for this exchange.
    #[error("response headers were already written")]
    HeadersAlreadyWritten,

    /// A body write or finish arrived before the response start.
    #[error("response headers have not been written")]
    HeadersNotWritten,

    /// The terminating body event was already queued.
    #[error("response already finished")]
    AlreadyFinished,

    /// The exchange was torn down by the inbound side.
    #[error("connection closed")]
    Closed,

    /// An earlier send failed and the outbound queue was abandoned.
    #[error("outbound queue aborted after an earlier send failure")]
    Aborted,

    /// The gateway transport rejected a primitive.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A handler intake operation failed.
    #[error("handler error: {0}")]
    Handler(anyhow::Error),
}
