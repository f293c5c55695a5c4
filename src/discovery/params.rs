//! Connection parameters for one discovery round.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Host used when the caller does not name one.
pub const DEFAULT_HOST: &str = "127.0.0.1";

// ============================================================================
// ConnectionParams
// ============================================================================

/// Where to look for targets, and which URLs to keep.
///
/// Deserializes from the attach section of a launch configuration:
///
/// ```json
/// { "host": "127.0.0.1", "port": 9222, "urlFilter": "http://localhost:8080" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
    /// Host of the remote process.
    #[serde(default = "default_host")]
    host: String,
    /// Remote debugging port; the configured default applies when absent.
    #[serde(default)]
    port: Option<u16>,
    /// URL restriction applied after the type filter.
    #[serde(default)]
    url_filter: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

impl ConnectionParams {
    /// Creates parameters for `host` with no port and no URL filter.
    #[inline]
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            url_filter: None,
        }
    }

    /// Sets the remote debugging port.
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the URL filter.
    #[inline]
    #[must_use]
    pub fn with_url_filter(mut self, url_filter: impl Into<String>) -> Self {
        self.url_filter = Some(url_filter.into());
        self
    }

    /// Returns the host, trimmed.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.trim()
    }

    /// Returns the port, if set.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the URL filter; blank filters read as absent.
    #[inline]
    #[must_use]
    pub fn url_filter(&self) -> Option<&str> {
        self.url_filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the host is empty or the port
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        if self.host().is_empty() {
            return Err(Error::invalid_argument("host must not be empty"));
        }
        if self.port == Some(0) {
            return Err(Error::invalid_argument("port must not be zero"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_localhost() {
        let params = ConnectionParams::default();
        assert_eq!(params.host(), "127.0.0.1");
        assert!(params.port().is_none());
        assert!(params.url_filter().is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let params = ConnectionParams::new("devbox")
            .with_port(9333)
            .with_url_filter("http://localhost:8080");

        assert_eq!(params.host(), "devbox");
        assert_eq!(params.port(), Some(9333));
        assert_eq!(params.url_filter(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_blank_url_filter_is_absent() {
        let params = ConnectionParams::default().with_url_filter("   ");
        assert!(params.url_filter().is_none());
    }

    #[test]
    fn test_validate_empty_host() {
        let err = ConnectionParams::new(" ").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_validate_zero_port() {
        assert!(ConnectionParams::default().with_port(0).validate().is_err());
    }

    #[test]
    fn test_deserialize_launch_config() {
        let params: ConnectionParams =
            serde_json::from_str(r#"{"port": 9222, "urlFilter": "http://localhost:8080"}"#)
                .expect("valid config");

        assert_eq!(params.host(), "127.0.0.1");
        assert_eq!(params.port(), Some(9222));
        assert_eq!(params.url_filter(), Some("http://localhost:8080"));
    }
}
