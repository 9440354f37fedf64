//! Exchange scope: immutable metadata for one HTTP exchange.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::gateway::HeaderPair;

/// The only scope type this crate serves.
pub const HTTP_SCOPE_TYPE: &str = "http";

fn default_http_version() -> String {
    "1.1".to_string()
}

/// Metadata delivered by the transport at exchange start.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Scope {
    /// Scope type; must be `"http"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Request method, e.g. `GET`.
    pub method: String,

    /// Decoded request path.
    pub path: String,

    /// Original percent-encoded path, if the transport kept it.
    #[serde(default)]
    pub raw_path: Option<Bytes>,

    /// Raw query string, without the leading `?`.
    #[serde(default)]
    pub query_string: Bytes,

    /// Protocol version without the `HTTP/` prefix, e.g. `1.1`.
    #[serde(default = "default_http_version")]
    pub http_version: String,

    /// Request headers in arrival order.
    #[serde(default)]
    pub headers: Vec<HeaderPair>,

    /// Client `(host, port)`.
    #[serde(default)]
    pub client: Option<(String, u16)>,

    /// URL scheme.
    #[serde(default)]
    pub scheme: Option<String>,
}

impl Scope {
    /// Create an HTTP/1.1 scope with no headers or query.
    pub fn http(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: HTTP_SCOPE_TYPE.to_string(),
            method: method.into(),
            path: path.into(),
            raw_path: None,
            query_string: Bytes::new(),
            http_version: default_http_version(),
            headers: Vec::new(),
            client: None,
            scheme: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<Bytes>) -> Self {
        self.query_string = query.into();
        self
    }

    pub fn with_raw_path(mut self, raw_path: impl Into<Bytes>) -> Self {
        self.raw_path = Some(raw_path.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_client(mut self, host: impl Into<String>, port: u16) -> Self {
        self.client = Some((host.into(), port));
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Fail fast unless this is a well-formed HTTP scope.
    pub fn ensure_http(&self) -> Result<(), BridgeError> {
        if self.kind != HTTP_SCOPE_TYPE {
            return Err(BridgeError::UnsupportedScope(self.kind.clone()));
        }
        if self.method.is_empty() {
            return Err(BridgeError::InvalidScope("missing method".into()));
        }
        if self.path.is_empty() && self.raw_path.as_ref().map_or(true, |p| p.is_empty()) {
            return Err(BridgeError::InvalidScope("missing path".into()));
        }
        Ok(())
    }

    /// Client host, or `default` when the transport did not report one.
    pub fn client_host<'a>(&'a self, default: &'a str) -> &'a str {
        self.client.as_ref().map_or(default, |(host, _)| host.as_str())
    }

    /// URL scheme, or `default` when absent.
    pub fn scheme<'a>(&'a self, default: &'a str) -> &'a str {
        self.scheme.as_deref().unwrap_or(default)
    }
}
