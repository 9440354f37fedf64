//! Inbound and outbound event shapes exchanged with the gateway transport.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A raw `(name, value)` header pair as carried by gateway events.
pub type HeaderPair = (Bytes, Bytes);

/// Events produced by the transport's `receive` primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundEvent {
    /// A chunk of request body.
    #[serde(rename = "http.request")]
    Request {
        #[serde(default)]
        body: Bytes,
        #[serde(default)]
        more_body: bool,
    },

    /// The client went away.
    #[serde(rename = "http.disconnect")]
    Disconnect,
}

impl InboundEvent {
    /// Build a request chunk event.
    pub fn request(body: impl Into<Bytes>, more_body: bool) -> Self {
        Self::Request {
            body: body.into(),
            more_body,
        }
    }
}

/// Events handed to the transport's `send` primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    #[serde(rename = "http.response.start")]
    ResponseStart {
        status: u16,
        #[serde(default)]
        headers: Vec<HeaderPair>,
    },

    #[serde(rename = "http.response.body")]
    ResponseBody {
        #[serde(default)]
        body: Bytes,
        #[serde(default)]
        more_body: bool,
    },
}

impl OutboundEvent {
    /// The wire `type` of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResponseStart { .. } => "http.response.start",
            Self::ResponseBody { .. } => "http.response.body",
        }
    }

    /// True for the body event that terminates the response.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ResponseBody { more_body: false, .. })
    }
}
