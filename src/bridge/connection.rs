//! Push-model connection backed by the gateway `send` primitive.
//!
//! # Responsibilities
//! - Give each exchange a unique ID for tracing
//! - Enforce response framing: one start, body chunks, one terminating chunk
//! - Track bridge state (Open → Closing → Closed)
//! - Notify the handler once when the inbound side disconnects

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use http::HeaderMap;

use crate::bridge::queue::{SendHandle, SendQueue};
use crate::bridge::{CompletionSignal, CompletionWaiter};
use crate::error::BridgeError;
use crate::gateway::EventSink;
use crate::http::response::{response_body, response_start};
use crate::http::{HeaderDenyList, StartLine};
use crate::observability::metrics::BridgeMetrics;

/// Global atomic counter for exchange IDs.
/// Relaxed ordering is enough since we only need uniqueness.
static EXCHANGE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExchangeId(u64);

impl ExchangeId {
    /// Generate a new unique exchange ID.
    pub fn new() -> Self {
        Self(EXCHANGE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exch-{}", self.0)
    }
}

/// Bridge state for lifecycle tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Accepting writes.
    Open,
    /// The terminating body event is queued but not yet sent.
    Closing,
    /// Completion resolved: finished, abandoned or aborted.
    Closed,
}

/// Who is on the other end of the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    pub remote_ip: String,
    pub protocol: String,
}

type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

struct Framing {
    state: BridgeState,
    headers_written: bool,
}

struct Shared {
    id: ExchangeId,
    context: ConnectionContext,
    deny: Arc<HeaderDenyList>,
    framing: Mutex<Framing>,
    close_callback: Mutex<Option<CloseCallback>>,
    completion: Arc<CompletionSignal>,
}

/// Connection handed to the push-model handler.
///
/// Clones share one exchange. Write methods only enqueue; the returned
/// [`SendHandle`] reports the transport's verdict.
#[derive(Clone)]
pub struct HttpConnection {
    shared: Arc<Shared>,
    queue: SendQueue,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HttpConnection {
    /// Create the bridge for one exchange and spawn its send queue.
    pub fn spawn<S: EventSink>(
        id: ExchangeId,
        context: ConnectionContext,
        deny: Arc<HeaderDenyList>,
        metrics: BridgeMetrics,
        sink: S,
    ) -> Self {
        let completion = Arc::new(CompletionSignal::new());
        let queue = SendQueue::spawn(id, sink, completion.clone(), metrics);
        Self {
            shared: Arc::new(Shared {
                id,
                context,
                deny,
                framing: Mutex::new(Framing {
                    state: BridgeState::Open,
                    headers_written: false,
                }),
                close_callback: Mutex::new(None),
                completion,
            }),
            queue,
        }
    }

    pub fn id(&self) -> ExchangeId {
        self.shared.id
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.shared.context
    }

    pub fn state(&self) -> BridgeState {
        if self.shared.completion.is_resolved() {
            return BridgeState::Closed;
        }
        lock(&self.shared.framing).state
    }

    /// Write the response start, optionally followed by a first body chunk.
    ///
    /// The chunk is sent with `more_body = true`; only [`finish`](Self::finish)
    /// terminates the body.
    pub fn write_headers(
        &self,
        start_line: &StartLine,
        headers: &HeaderMap,
        chunk: Option<Bytes>,
    ) -> Result<SendHandle, BridgeError> {
        let StartLine::Response(start_line) = start_line else {
            return Err(self.rejected(BridgeError::RequestStartLine));
        };

        let mut framing = lock(&self.shared.framing);
        self.ensure_writable(&framing)?;
        if framing.headers_written {
            return Err(self.rejected(BridgeError::HeadersAlreadyWritten));
        }
        framing.headers_written = true;

        let mut events = vec![response_start(start_line, headers, &self.shared.deny)];
        if let Some(chunk) = chunk.filter(|chunk| !chunk.is_empty()) {
            events.push(response_body(chunk, true));
        }
        tracing::debug!(exchange_id = %self.shared.id, status = start_line.code, "Writing response headers");
        Ok(self.queue.enqueue(events, false))
    }

    /// Write one body chunk.
    pub fn write(&self, chunk: Bytes) -> Result<SendHandle, BridgeError> {
        let framing = lock(&self.shared.framing);
        self.ensure_writable(&framing)?;
        if !framing.headers_written {
            return Err(self.rejected(BridgeError::HeadersNotWritten));
        }
        Ok(self.queue.enqueue(vec![response_body(chunk, true)], false))
    }

    /// Queue the terminating body event. Completion resolves once it is sent.
    ///
    /// Finishing before the headers were written abandons the exchange.
    pub fn finish(&self) -> Result<SendHandle, BridgeError> {
        let mut framing = lock(&self.shared.framing);
        self.ensure_writable(&framing)?;
        if !framing.headers_written {
            framing.state = BridgeState::Closed;
            self.shared.completion.resolve();
            return Err(self.rejected(BridgeError::HeadersNotWritten));
        }
        framing.state = BridgeState::Closing;
        Ok(self.queue.enqueue(vec![response_body(Bytes::new(), false)], true))
    }

    /// Abandon the exchange because the inbound side went away.
    ///
    /// Runs the close callback and resolves completion at once, even if the
    /// terminating event is still queued. A no-op once completion resolved.
    pub fn close(&self) {
        {
            let mut framing = lock(&self.shared.framing);
            if framing.state == BridgeState::Closed || self.shared.completion.is_resolved() {
                return;
            }
            framing.state = BridgeState::Closed;
        }

        // Take the callback out so it runs without the lock held.
        let callback = lock(&self.shared.close_callback).take();
        if let Some(callback) = callback {
            callback();
        }
        self.shared.completion.resolve();
        tracing::debug!(exchange_id = %self.shared.id, "Connection closed by inbound side");
    }

    /// Register the disconnect notification, replacing any earlier one.
    pub fn set_close_callback<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *lock(&self.shared.close_callback) = Some(Box::new(callback));
    }

    /// Await the exchange's completion signal.
    pub fn completion(&self) -> CompletionWaiter {
        self.shared.completion.waiter()
    }

    pub fn is_complete(&self) -> bool {
        self.shared.completion.is_resolved()
    }

    fn ensure_writable(&self, framing: &Framing) -> Result<(), BridgeError> {
        if self.shared.completion.is_resolved() {
            return Err(self.rejected(BridgeError::Closed));
        }
        match framing.state {
            BridgeState::Open => Ok(()),
            BridgeState::Closing => Err(self.rejected(BridgeError::AlreadyFinished)),
            BridgeState::Closed => Err(self.rejected(BridgeError::Closed)),
        }
    }

    fn rejected(&self, error: BridgeError) -> BridgeError {
        // Writes racing a disconnect are expected.
        if matches!(error, BridgeError::Closed) {
            tracing::debug!(exchange_id = %self.shared.id, "Write after close rejected");
        } else {
            tracing::warn!(exchange_id = %self.shared.id, error = %error, "Rejected write");
        }
        error
    }
}

impl fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConnection")
            .field("id", &self.shared.id)
            .field("context", &self.shared.context)
            .field("state", &self.state())
            .finish()
    }
}
