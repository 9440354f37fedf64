//! Inbound translation: gateway scope → push-model start line and headers.
//!
//! # Responsibilities
//! - Rebuild the request target from `raw_path` (or encode `path`) plus query
//! - Format the protocol version as `HTTP/<version>`
//! - Collect headers into a multi-valued map, keeping duplicates

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::BridgeError;
use crate::gateway::Scope;
use crate::http::RequestStartLine;

/// Characters left untouched when encoding a decoded path.
const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Request target (path plus `?query` when present) as sent on the start line.
pub fn request_target(scope: &Scope) -> Result<String, BridgeError> {
    let mut target = match &scope.raw_path {
        Some(raw) if !raw.is_empty() => raw.to_vec(),
        _ => utf8_percent_encode(&scope.path, PATH_SAFE)
            .to_string()
            .into_bytes(),
    };
    if !scope.query_string.is_empty() {
        target.push(b'?');
        target.extend_from_slice(&scope.query_string);
    }
    if !target.is_ascii() {
        return Err(BridgeError::InvalidScope(
            "request target is not ASCII".into(),
        ));
    }
    String::from_utf8(target).map_err(|e| BridgeError::InvalidScope(e.to_string()))
}

/// Start line for the push-model request.
pub fn request_start_line(scope: &Scope) -> Result<RequestStartLine, BridgeError> {
    let method = Method::from_bytes(scope.method.as_bytes())
        .map_err(|_| BridgeError::InvalidScope(format!("invalid method {:?}", scope.method)))?;
    Ok(RequestStartLine {
        method,
        path: request_target(scope)?,
        version: format!("HTTP/{}", scope.http_version),
    })
}

/// Request headers in arrival order; repeated names are appended, not replaced.
pub fn request_headers(scope: &Scope) -> Result<HeaderMap, BridgeError> {
    let mut headers = HeaderMap::with_capacity(scope.headers.len());
    for (name, value) in &scope.headers {
        let name = HeaderName::from_bytes(name)
            .map_err(|_| BridgeError::InvalidScope(format!("invalid header name {:?}", name)))?;
        let value = HeaderValue::from_bytes(value)
            .map_err(|_| BridgeError::InvalidScope(format!("invalid value for header {}", name)))?;
        headers.append(name, value);
    }
    Ok(headers)
}
