//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODEXPRESS_API_URL` - Base URL of the order backend
//!   (e.g., `http://localhost:8082/api/auth/`)
//!
//! ## Optional
//! - `FOODEXPRESS_API_TOKEN` - Bearer token attached to every request when
//!   the backend sits behind its auth layer

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Order backend connection configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the backend API; always ends with a slash so endpoint
    /// paths join underneath it.
    pub base_url: Url,
    /// Bearer token for authenticated deployments.
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl GatewayConfig {
    /// Build a configuration from a base URL string.
    ///
    /// A missing trailing slash is corrected here; `Url::join` would
    /// otherwise drop the last path segment on every request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| {
            ConfigError::InvalidEnvVar("FOODEXPRESS_API_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            api_token: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `FOODEXPRESS_API_URL` is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("FOODEXPRESS_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("FOODEXPRESS_API_URL".to_string()))?;

        let mut config = Self::new(&base_url)?;
        config.api_token = std::env::var("FOODEXPRESS_API_TOKEN")
            .ok()
            .map(SecretString::from);
        Ok(config)
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.api_token = Some(token);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_appended() {
        let config = GatewayConfig::new("http://localhost:8082/api/auth").expect("valid url");
        assert_eq!(config.base_url.as_str(), "http://localhost:8082/api/auth/");
    }

    #[test]
    fn test_existing_trailing_slash_kept() {
        let config = GatewayConfig::new("http://localhost:8082/api/auth/").expect("valid url");
        assert_eq!(config.base_url.as_str(), "http://localhost:8082/api/auth/");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = GatewayConfig::new("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = GatewayConfig::new("http://localhost:8082/")
            .expect("valid url")
            .with_token(SecretString::from("super-secret-token"));
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-token"));
    }
}
