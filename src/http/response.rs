//! Outbound translation: push-model status and headers → gateway events.
//!
//! # Responsibilities
//! - Lower-case header names and re-encode them as byte pairs
//! - Strip headers the transport supplies itself
//! - Build `http.response.start` and `http.response.body` events
//!
//! # Design Decisions
//! - The deny-list is injected configuration, never a mutable global
//! - One byte pair per header entry; repeated names stay repeated

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName};

use crate::error::BridgeError;
use crate::gateway::OutboundEvent;
use crate::http::ResponseStartLine;

/// Header names the transport writes on its own.
pub const DEFAULT_STRIPPED_HEADERS: &[&str] = &["date", "server"];

/// Response header names that never reach the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDenyList {
    names: Vec<HeaderName>,
}

impl HeaderDenyList {
    /// Compile a deny-list from header names, in any case.
    pub fn new<I, S>(names: I) -> Result<Self, BridgeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes())
                    .map_err(|_| BridgeError::InvalidHeader(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { names })
    }

    /// An empty deny-list: every header is forwarded.
    pub fn none() -> Self {
        Self { names: Vec::new() }
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> &[HeaderName] {
        &self.names
    }
}

impl Default for HeaderDenyList {
    fn default() -> Self {
        Self {
            names: DEFAULT_STRIPPED_HEADERS
                .iter()
                .map(|name| HeaderName::from_static(name))
                .collect(),
        }
    }
}

/// Build the `http.response.start` event for a response.
pub fn response_start(
    start_line: &ResponseStartLine,
    headers: &HeaderMap,
    deny: &HeaderDenyList,
) -> OutboundEvent {
    // HeaderName is stored lower-cased already. Values of one name come out
    // together, in the order names were first inserted.
    let headers = headers
        .iter()
        .filter(|(name, _)| !deny.contains(name))
        .map(|(name, value)| {
            (
                Bytes::copy_from_slice(name.as_str().as_bytes()),
                Bytes::copy_from_slice(value.as_bytes()),
            )
        })
        .collect();
    OutboundEvent::ResponseStart {
        status: start_line.code,
        headers,
    }
}

/// Build an `http.response.body` event.
pub fn response_body(body: Bytes, more_body: bool) -> OutboundEvent {
    OutboundEvent::ResponseBody { body, more_body }
}
