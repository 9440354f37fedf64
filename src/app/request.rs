//! The request object handed to the push-model application.

use http::{HeaderMap, Method};

use crate::bridge::{ConnectionContext, HttpConnection};
use crate::http::RequestStartLine;

/// One inbound request, bound to the connection that answers it.
#[derive(Debug, Clone)]
pub struct ServerRequest {
    start_line: RequestStartLine,
    headers: HeaderMap,
    connection: HttpConnection,
}

impl ServerRequest {
    pub fn new(start_line: RequestStartLine, headers: HeaderMap, connection: HttpConnection) -> Self {
        Self {
            start_line,
            headers,
            connection,
        }
    }

    pub fn start_line(&self) -> &RequestStartLine {
        &self.start_line
    }

    pub fn method(&self) -> &Method {
        &self.start_line.method
    }

    /// Request target as sent, including any query string.
    pub fn uri(&self) -> &str {
        &self.start_line.path
    }

    /// Percent-encoded path without the query string.
    pub fn path(&self) -> &str {
        self.uri().split_once('?').map_or(self.uri(), |(path, _)| path)
    }

    /// Raw query string, empty when absent.
    pub fn query(&self) -> &str {
        self.uri().split_once('?').map_or("", |(_, query)| query)
    }

    /// Decoded query arguments in order; repeated names are kept.
    pub fn query_arguments(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query().as_bytes())
            .into_owned()
            .collect()
    }

    /// Last value of a query argument.
    pub fn query_argument(&self, name: &str) -> Option<String> {
        self.query_arguments()
            .into_iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn connection(&self) -> &HttpConnection {
        &self.connection
    }

    pub fn remote_ip(&self) -> &str {
        &self.context().remote_ip
    }

    pub fn protocol(&self) -> &str {
        &self.context().protocol
    }

    fn context(&self) -> &ConnectionContext {
        self.connection.context()
    }
}
