//! Request pump: drives one exchange from gateway events into a push-model handler.
//!
//! # State Machine
//! ```text
//! AwaitingHeaders → StreamingBody ─┬→ Finished ─────┬→ AwaitingCompletion → Done
//!                     ↺ per chunk  └→ Disconnected ─┘
//! ```
//!
//! # Design Decisions
//! - Exactly one inbound event is outstanding; the next `receive` waits until
//!   the previous chunk's intake has settled
//! - A disconnect closes the bridge and stops body delivery at once
//! - The pump returns only after the bridge's completion signal resolved, so a
//!   `finish` issued after end-of-body is still awaited
//! - After the handler finished its response early, remaining request chunks
//!   are still delivered (drained) until end-of-body or disconnect

use std::sync::Arc;

use tracing::Instrument;

use crate::app::{Application, RequestHandler, ServerRequest};
use crate::bridge::{ConnectionContext, ExchangeId, HttpConnection};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::gateway::{EventSink, EventSource, InboundEvent, Scope};
use crate::http::request::{request_headers, request_start_line};
use crate::http::HeaderDenyList;
use crate::observability::metrics::BridgeMetrics;

/// Request pump states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    AwaitingHeaders,
    StreamingBody,
    Finished,
    Disconnected,
    AwaitingCompletion,
    Done,
}

/// How an exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The request body was fully delivered and the response completed.
    Finished,
    /// The client went away; the exchange was abandoned.
    Disconnected,
}

impl ExchangeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Serves push-model application `A` over the gateway protocol.
///
/// Cheap to clone; clones share the application and configuration.
pub struct GatewayAdapter<A> {
    app: Arc<A>,
    config: Arc<BridgeConfig>,
    deny: Arc<HeaderDenyList>,
    metrics: BridgeMetrics,
}

impl<A> Clone for GatewayAdapter<A> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            config: self.config.clone(),
            deny: self.deny.clone(),
            metrics: self.metrics,
        }
    }
}

impl<A: Application> GatewayAdapter<A> {
    /// Adapter with the default configuration.
    pub fn new(app: A) -> Self {
        Self {
            app: Arc::new(app),
            config: Arc::new(BridgeConfig::default()),
            deny: Arc::new(HeaderDenyList::default()),
            metrics: BridgeMetrics::default(),
        }
    }

    /// Adapter with an explicit configuration.
    pub fn with_config(app: A, config: BridgeConfig) -> Result<Self, BridgeError> {
        let deny = config.deny_list()?;
        let metrics = BridgeMetrics::from_config(&config.observability);
        Ok(Self {
            app: Arc::new(app),
            config: Arc::new(config),
            deny: Arc::new(deny),
            metrics,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Handle one exchange end to end.
    ///
    /// Fails before anything is sent when the scope is not an HTTP scope.
    pub async fn call<R, S>(
        &self,
        scope: Scope,
        receive: R,
        send: S,
    ) -> Result<ExchangeOutcome, BridgeError>
    where
        R: EventSource,
        S: EventSink,
    {
        if let Err(e) = scope.ensure_http() {
            tracing::warn!(error = %e, "Rejecting scope");
            self.metrics.record_exchange("failed");
            return Err(e);
        }

        let id = ExchangeId::new();
        let span = tracing::debug_span!(
            "exchange",
            exchange_id = %id,
            method = %scope.method,
            path = %scope.path,
        );

        let result = self.pump(id, scope, receive, send).instrument(span).await;
        match &result {
            Ok(outcome) => self.metrics.record_exchange(outcome.as_str()),
            Err(e) => {
                tracing::warn!(exchange_id = %id, error = %e, "Exchange failed");
                self.metrics.record_exchange("failed");
            }
        }
        result
    }

    async fn pump<R, S>(
        &self,
        id: ExchangeId,
        scope: Scope,
        mut receive: R,
        send: S,
    ) -> Result<ExchangeOutcome, BridgeError>
    where
        R: EventSource,
        S: EventSink,
    {
        let start_line = request_start_line(&scope)?;
        let headers = request_headers(&scope)?;
        let context = ConnectionContext {
            remote_ip: scope
                .client_host(&self.config.scope.default_client_host)
                .to_string(),
            protocol: scope.scheme(&self.config.scope.default_scheme).to_string(),
        };

        tracing::debug!(start_line = %start_line, remote_ip = %context.remote_ip, "Exchange started");

        let connection = HttpConnection::spawn(id, context, self.deny.clone(), self.metrics, send);
        let request = ServerRequest::new(start_line.clone(), headers.clone(), connection.clone());
        let mut handler = self.app.find_handler(request);

        let mut state = PumpState::AwaitingHeaders;
        handler
            .headers_received(&start_line, &headers)
            .settle()
            .await
            .map_err(BridgeError::Handler)?;
        transition(&mut state, PumpState::StreamingBody);

        let outcome = loop {
            match receive.receive().await? {
                InboundEvent::Request { body, more_body } => {
                    if !body.is_empty() {
                        tracing::trace!(len = body.len(), more_body, "Delivering body chunk");
                        handler
                            .data_received(body)
                            .settle()
                            .await
                            .map_err(BridgeError::Handler)?;
                    }
                    if !more_body {
                        handler.finish();
                        transition(&mut state, PumpState::Finished);
                        break ExchangeOutcome::Finished;
                    }
                }
                InboundEvent::Disconnect => {
                    tracing::debug!("Client disconnected");
                    connection.close();
                    transition(&mut state, PumpState::Disconnected);
                    break ExchangeOutcome::Disconnected;
                }
            }
        };

        // The handler may still hold the connection; release ours.
        drop(handler);

        transition(&mut state, PumpState::AwaitingCompletion);
        connection.completion().wait().await;
        transition(&mut state, PumpState::Done);

        Ok(outcome)
    }
}

fn transition(state: &mut PumpState, next: PumpState) {
    tracing::trace!(from = ?state, to = ?next, "Pump state transition");
    *state = next;
}
