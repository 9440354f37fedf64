//! Per-exchange serial send queue.
//!
//! # Responsibilities
//! - Own the gateway sink for one exchange
//! - Deliver queued events strictly in enqueue order, one `send` at a time
//! - Report each job's outcome through its [`SendHandle`]
//! - Resolve the completion signal after the terminating event, or on failure
//!
//! # Design Decisions
//! - Enqueueing is synchronous, so call order is queue order even when
//!   handles are never awaited
//! - Nothing is sent once completion has resolved (finish done, close, abort);
//!   the check runs before every event, so a close that lands mid-job drops
//!   the rest of that job
//! - After a send failure every later job fails with `Aborted`

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};

use crate::bridge::{CompletionSignal, ExchangeId};
use crate::error::BridgeError;
use crate::gateway::{EventSink, OutboundEvent};
use crate::observability::metrics::BridgeMetrics;

/// One enqueued write: its events are sent back to back.
struct Job {
    events: Vec<OutboundEvent>,
    terminal: bool,
    reply: oneshot::Sender<Result<(), BridgeError>>,
}

/// Completion of one enqueued write.
///
/// Dropping the handle does not cancel the send.
#[derive(Debug)]
pub struct SendHandle {
    rx: oneshot::Receiver<Result<(), BridgeError>>,
}

impl Future for SendHandle {
    type Output = Result<(), BridgeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A dropped reply means the send task is gone.
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|reply| reply.unwrap_or(Err(BridgeError::Aborted)))
    }
}

/// Sending half of the queue; cheap to clone.
#[derive(Debug, Clone)]
pub struct SendQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl SendQueue {
    /// Spawn the send task for one exchange.
    pub fn spawn<S: EventSink>(
        id: ExchangeId,
        sink: S,
        completion: Arc<CompletionSignal>,
        metrics: BridgeMetrics,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(id, sink, rx, completion, metrics));
        Self { tx }
    }

    /// Enqueue events; `terminal` marks the job that ends the response.
    pub fn enqueue(&self, events: Vec<OutboundEvent>, terminal: bool) -> SendHandle {
        let (reply, rx) = oneshot::channel();
        let job = Job {
            events,
            terminal,
            reply,
        };
        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            let _ = job.reply.send(Err(BridgeError::Aborted));
        }
        SendHandle { rx }
    }
}

async fn run<S: EventSink>(
    id: ExchangeId,
    sink: S,
    mut jobs: mpsc::UnboundedReceiver<Job>,
    completion: Arc<CompletionSignal>,
    metrics: BridgeMetrics,
) {
    let mut aborted = false;

    while let Some(job) = jobs.recv().await {
        let result = if aborted {
            Err(BridgeError::Aborted)
        } else {
            deliver(id, &sink, job.events, &completion, metrics).await
        };

        if let Err(BridgeError::Gateway(e)) = &result {
            tracing::warn!(exchange_id = %id, error = %e, "Gateway send failed, abandoning exchange");
            metrics.record_send_failure();
            aborted = true;
            completion.resolve();
        }
        if job.terminal {
            completion.resolve();
        }

        // The caller may have dropped its handle.
        let _ = job.reply.send(result);
    }

    tracing::trace!(exchange_id = %id, "Send queue drained");
}

async fn deliver<S: EventSink>(
    id: ExchangeId,
    sink: &S,
    events: Vec<OutboundEvent>,
    completion: &CompletionSignal,
    metrics: BridgeMetrics,
) -> Result<(), BridgeError> {
    for event in events {
        let kind = event.kind();
        if completion.is_resolved() {
            tracing::debug!(exchange_id = %id, event = kind, "Dropping event after exchange completed");
            return Err(BridgeError::Closed);
        }
        tracing::trace!(exchange_id = %id, event = kind, "Sending event");
        sink.send(event).await?;
        metrics.record_outbound(kind);
    }
    Ok(())
}
