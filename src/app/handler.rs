//! Handler and application traits consumed by the adapter.

use std::future::Future;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::HeaderMap;

use crate::app::ServerRequest;
use crate::http::RequestStartLine;

/// Result of a handler intake call.
pub enum Intake {
    /// Nothing left to wait for.
    Completed,
    /// The adapter must await this before feeding more input.
    Pending(BoxFuture<'static, anyhow::Result<()>>),
}

impl Intake {
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Wait until the intake operation has settled.
    pub async fn settle(self) -> anyhow::Result<()> {
        match self {
            Self::Completed => Ok(()),
            Self::Pending(future) => future.await,
        }
    }
}

impl std::fmt::Debug for Intake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Per-request delegate fed by the adapter.
pub trait RequestHandler: Send + 'static {
    /// Request metadata arrived. May reject the request before any body is read.
    fn headers_received(&mut self, _start_line: &RequestStartLine, _headers: &HeaderMap) -> Intake {
        Intake::Completed
    }

    /// One non-empty body chunk, in arrival order.
    fn data_received(&mut self, chunk: Bytes) -> Intake;

    /// The request body is complete.
    fn finish(&mut self);
}

/// Push-model application: maps a request to its handler.
pub trait Application: Send + Sync + 'static {
    type Handler: RequestHandler;

    fn find_handler(&self, request: ServerRequest) -> Self::Handler;
}
