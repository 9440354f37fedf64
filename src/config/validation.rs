//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate header names in the deny-list
//! - Validate scope fallbacks and log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>

use http::HeaderName;
use thiserror::Error;

use crate::config::schema::BridgeConfig;

/// A semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("headers.strip_response_headers: {0:?} is not a valid header name")]
    InvalidHeaderName(String),

    #[error("scope.default_scheme: expected http or https, got {0:?}")]
    InvalidScheme(String),

    #[error("scope.default_client_host must not be empty")]
    EmptyClientHost,

    #[error("observability.log_level must not be empty")]
    EmptyLogLevel,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for name in &config.headers.strip_response_headers {
        if HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }

    if !matches!(config.scope.default_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::InvalidScheme(
            config.scope.default_scheme.clone(),
        ));
    }

    if config.scope.default_client_host.is_empty() {
        errors.push(ValidationError::EmptyClientHost);
    }

    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError::EmptyLogLevel);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
