//! Discovery options.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use devtools_discovery::DiscoveryOptions;
//!
//! let options = DiscoveryOptions::new()
//!     .with_default_port(9229)
//!     .with_round_timeout(Duration::from_secs(10));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Remote debugging port used when the caller does not name one.
pub const DEFAULT_PORT: u16 = 9222;

/// Path of the target list on the discovery endpoint.
pub const DEFAULT_PATH: &str = "/json/list";

/// Transport timeout for one discovery request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// DiscoveryOptions
// ============================================================================

/// Discovery configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Port used when [`ConnectionParams`](super::ConnectionParams) has none.
    pub default_port: u16,

    /// Path of the target list.
    pub path: String,

    /// Use `https` instead of `http`.
    pub secure: bool,

    /// Transport timeout for the discovery request.
    pub request_timeout: Duration,

    /// Deadline for the whole round, separate from the transport timeout.
    pub round_timeout: Option<Duration>,

    /// Rewrite loopback attach endpoints to the discovery host.
    pub rewrite_remote_endpoints: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl DiscoveryOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            secure: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            round_timeout: None,
            rewrite_remote_endpoints: true,
        }
    }

    /// Sets the default port.
    #[inline]
    #[must_use]
    pub fn with_default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    /// Sets the discovery path.
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Enables `https`.
    #[inline]
    #[must_use]
    pub fn with_secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Sets the transport timeout.
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the round deadline.
    #[inline]
    #[must_use]
    pub fn with_round_timeout(mut self, timeout: Duration) -> Self {
        self.round_timeout = Some(timeout);
        self
    }

    /// Sets whether loopback endpoints are rewritten for remote hosts.
    #[inline]
    #[must_use]
    pub fn with_rewrite_remote_endpoints(mut self, rewrite: bool) -> Self {
        self.rewrite_remote_endpoints = rewrite;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DiscoveryOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_port == 0 {
            return Err("Default port must be greater than zero".to_string());
        }
        if !self.path.starts_with('/') {
            return Err(format!("Discovery path must start with '/': {}", self.path));
        }
        if self.request_timeout.is_zero() {
            return Err("Request timeout must be greater than zero".to_string());
        }
        if self.round_timeout.is_some_and(|t| t.is_zero()) {
            return Err("Round timeout must be greater than zero".to_string());
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
    fn test_new_creates_default() {
        let options = DiscoveryOptions::new();
        assert_eq!(options.default_port, 9222);
        assert_eq!(options.path, "/json/list");
        assert!(!options.secure);
        assert_eq!(options.request_timeout, Duration::from_secs(5));
        assert!(options.round_timeout.is_none());
        assert!(options.rewrite_remote_endpoints);
    }

    #[test]
    fn test_builder_chain() {
        let options = DiscoveryOptions::new()
            .with_default_port(9229)
            .with_path("/json")
            .with_secure()
            .with_round_timeout(Duration::from_secs(1))
            .with_rewrite_remote_endpoints(false);

        assert_eq!(options.default_port, 9229);
        assert_eq!(options.path, "/json");
        assert!(options.secure);
        assert_eq!(options.round_timeout, Some(Duration::from_secs(1)));
        assert!(!options.rewrite_remote_endpoints);
    }

    #[test]
    fn test_validate_valid() {
        assert!(DiscoveryOptions::new().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        assert!(DiscoveryOptions::new().with_default_port(0).validate().is_err());
    }

    #[test]
    fn test_validate_relative_path() {
        assert!(DiscoveryOptions::new().with_path("json/list").validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeouts() {
        assert!(
            DiscoveryOptions::new()
                .with_request_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(
            DiscoveryOptions::new()
                .with_round_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
