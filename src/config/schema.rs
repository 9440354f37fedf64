//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::http::response::DEFAULT_STRIPPED_HEADERS;
use crate::http::HeaderDenyList;

/// Root configuration for the adapter.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Response header handling.
    pub headers: HeaderConfig,

    /// Fallbacks for optional scope fields.
    pub scope: ScopeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl BridgeConfig {
    /// Compile the response header deny-list.
    pub fn deny_list(&self) -> Result<HeaderDenyList, BridgeError> {
        HeaderDenyList::new(&self.headers.strip_response_headers)
    }
}

/// Response header configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeaderConfig {
    /// Header names the transport supplies itself (case-insensitive).
    pub strip_response_headers: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            strip_response_headers: DEFAULT_STRIPPED_HEADERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/// Defaults used when the transport omits optional scope fields.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScopeConfig {
    /// Remote address reported when `client` is absent.
    pub default_client_host: String,

    /// Scheme reported when `scheme` is absent.
    pub default_scheme: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            default_client_host: "0.0.0.0".to_string(),
            default_scheme: "http".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Record `bridge_*` counters.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
