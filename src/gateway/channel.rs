//! In-memory gateway transport backed by tokio channels.
//!
//! [`pair`] returns the application-facing primitives plus a
//! [`TransportEnd`] that plays the role of the server: it pushes inbound
//! events and observes what the application sent back.

use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;

use crate::gateway::{EventSink, EventSource, GatewayError, HeaderPair, InboundEvent, OutboundEvent};

/// Application-side `receive` primitive.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<InboundEvent>,
}

impl EventSource for ChannelSource {
    async fn receive(&mut self) -> Result<InboundEvent, GatewayError> {
        self.rx.recv().await.ok_or(GatewayError::Closed)
    }
}

/// Application-side `send` primitive.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl EventSink for ChannelSink {
    async fn send(&self, event: OutboundEvent) -> Result<(), GatewayError> {
        self.tx.send(event).map_err(|_| GatewayError::Closed)
    }
}

/// Transport-side endpoint.
#[derive(Debug)]
pub struct TransportEnd {
    inbound: Option<mpsc::UnboundedSender<InboundEvent>>,
    outbound: mpsc::UnboundedReceiver<OutboundEvent>,
}

/// Create a connected in-memory transport.
pub fn pair() -> (ChannelSource, ChannelSink, TransportEnd) {
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    (
        ChannelSource { rx: in_rx },
        ChannelSink { tx: out_tx },
        TransportEnd {
            inbound: Some(in_tx),
            outbound: out_rx,
        },
    )
}

impl TransportEnd {
    /// Queue an inbound event for the application.
    pub fn push(&self, event: InboundEvent) -> Result<(), GatewayError> {
        self.inbound
            .as_ref()
            .ok_or(GatewayError::Closed)?
            .send(event)
            .map_err(|_| GatewayError::Closed)
    }

    /// Queue a request body chunk.
    pub fn push_body(&self, body: impl Into<Bytes>, more_body: bool) -> Result<(), GatewayError> {
        self.push(InboundEvent::request(body, more_body))
    }

    /// Queue a client disconnect.
    pub fn disconnect(&self) -> Result<(), GatewayError> {
        self.push(InboundEvent::Disconnect)
    }

    /// Stop producing inbound events; further `receive` calls fail with `Closed`.
    pub fn end_input(&mut self) {
        self.inbound = None;
    }

    /// Next outbound event, or `None` once the application side is gone.
    pub async fn next_outbound(&mut self) -> Option<OutboundEvent> {
        self.outbound.recv().await
    }

    /// Read outbound events through the terminating body event.
    pub async fn collect_response(&mut self) -> Result<CollectedResponse, GatewayError> {
        let mut response = CollectedResponse::default();
        while let Some(event) = self.next_outbound().await {
            response.events.push(event.clone());
            match event {
                OutboundEvent::ResponseStart { status, headers } => {
                    response.status = Some(status);
                    response.headers = headers;
                }
                OutboundEvent::ResponseBody { body, more_body } => {
                    response.body.extend_from_slice(&body);
                    if !more_body {
                        return Ok(response);
                    }
                }
            }
        }
        Err(GatewayError::Closed)
    }
}

/// A response reassembled from outbound events.
#[derive(Debug, Default)]
pub struct CollectedResponse {
    pub status: Option<u16>,
    pub headers: Vec<HeaderPair>,
    pub body: BytesMut,
    pub events: Vec<OutboundEvent>,
}

impl CollectedResponse {
    /// First value of a header, by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.as_bytes()))
            .and_then(|(_, value)| std::str::from_utf8(value).ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
