//! Request and response start lines of the push model.

use std::fmt;

use http::{Method, StatusCode};

/// `GET /path?query HTTP/1.1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestStartLine {
    pub method: Method,
    /// Percent-encoded request target including the query string.
    pub path: String,
    pub version: String,
}

/// `HTTP/1.1 200 OK`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStartLine {
    pub version: String,
    pub code: u16,
    pub reason: String,
}

impl ResponseStartLine {
    /// HTTP/1.1 start line with the canonical reason phrase for `code`.
    pub fn new(code: u16) -> Self {
        let reason = StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown");
        Self {
            version: "HTTP/1.1".to_string(),
            code,
            reason: reason.to_string(),
        }
    }
}

/// Either start line, as accepted by `HttpConnection::write_headers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    Request(RequestStartLine),
    Response(ResponseStartLine),
}

impl From<RequestStartLine> for StartLine {
    fn from(line: RequestStartLine) -> Self {
        Self::Request(line)
    }
}

impl From<ResponseStartLine> for StartLine {
    fn from(line: ResponseStartLine) -> Self {
        Self::Response(line)
    }
}

impl fmt::Display for RequestStartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.path, self.version)
    }
}

impl fmt::Display for ResponseStartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.version, self.code, self.reason)
    }
}
