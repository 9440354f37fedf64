//! Buffered response helper for handlers.
//!
//! Collects status, headers and body, then drives the connection's
//! `write_headers` / `write` / `finish` in the right order.

use bytes::{Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use http::HeaderMap;

use crate::bridge::{HttpConnection, SendHandle};
use crate::error::BridgeError;
use crate::http::{ResponseStartLine, StartLine};

const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
const SERVER_NAME: &str = concat!("gateway-bridge/", env!("CARGO_PKG_VERSION"));

/// Response under construction.
#[derive(Debug)]
pub struct ResponseWriter {
    connection: HttpConnection,
    status: u16,
    headers: HeaderMap,
    buffer: BytesMut,
    headers_written: bool,
    finished: bool,
}

impl ResponseWriter {
    pub fn new(connection: HttpConnection) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        headers.insert(SERVER, HeaderValue::from_static(SERVER_NAME));
        Self {
            connection,
            status: 200,
            headers,
            buffer: BytesMut::new(),
            headers_written: false,
            finished: false,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Replace a header.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), BridgeError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Add a header, keeping existing values.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), BridgeError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    pub fn clear_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    /// Append to the body buffer; nothing is sent until `flush` or `finish`.
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) {
        self.buffer.extend_from_slice(chunk.as_ref());
    }

    /// Send what is buffered. The first flush writes the headers.
    pub fn flush(&mut self) -> Result<SendHandle, BridgeError> {
        let chunk = self.buffer.split().freeze();
        if self.headers_written {
            return self.connection.write(chunk);
        }
        let start_line = StartLine::from(ResponseStartLine::new(self.status));
        let handle = self.connection.write_headers(&start_line, &self.headers, Some(chunk))?;
        self.headers_written = true;
        Ok(handle)
    }

    /// Flush the rest and terminate the response.
    ///
    /// Sets `Content-Length` when the body was never flushed before.
    pub fn finish(&mut self) -> Result<SendHandle, BridgeError> {
        if self.finished {
            return Err(BridgeError::AlreadyFinished);
        }
        if !self.headers_written && !self.headers.contains_key(CONTENT_LENGTH) {
            self.headers.insert(CONTENT_LENGTH, HeaderValue::from(self.buffer.len()));
        }
        if !self.headers_written || !self.buffer.is_empty() {
            let _ = self.flush()?;
        }
        self.finished = true;
        self.connection.finish()
    }

    pub fn connection(&self) -> &HttpConnection {
        &self.connection
    }

    /// Unsent body bytes.
    pub fn buffered(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buffer)
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), BridgeError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| BridgeError::InvalidHeader(name.to_string()))?;
    let value =
        HeaderValue::from_str(value).map_err(|_| BridgeError::InvalidHeader(name.to_string()))?;
    Ok((name, value))
}
