//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BridgeConfig, ConfigError> {
    let config: BridgeConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.headers.strip_response_headers, ["date", "server"]);
    }

    #[test]
    fn overrides_apply() {
        let config = parse_config(
            r#"
            [headers]
            strip_response_headers = ["Date", "Server", "X-Powered-By"]

            [scope]
            default_scheme = "https"

            [observability]
            metrics_enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.headers.strip_response_headers.len(), 3);
        assert!(!config.observability.metrics_enabled);
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.scope.default_scheme, "https");
        assert_eq!(config.scope.default_client_host, "0.0.0.0");
        assert_eq!(config.deny_list().unwrap().names().len(), 3);
    }

    #[test]
    fn syntax_errors_reported() {
        assert!(matches!(
            parse_config("[headers"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn semantic_errors_reported() {
        let err = parse_config(
            r#"
            [headers]
            strip_response_headers = ["bad header"]
            [scope]
            default_scheme = "gopher"
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/gateway-bridge.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
