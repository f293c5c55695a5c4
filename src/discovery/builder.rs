//! Builder pattern for discovery configuration.
//!
//! Provides a fluent API for configuring and creating [`Discovery`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use devtools_discovery::{Discovery, TargetFilter};
//!
//! # fn example() -> devtools_discovery::Result<()> {
//! let discovery = Discovery::builder()
//!     .default_port(9222)
//!     .request_timeout(Duration::from_secs(2))
//!     .filter(TargetFilter::pages())
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

use super::core::Discovery;
use super::filter::TargetFilter;
use super::options::DiscoveryOptions;

// ============================================================================
// DiscoveryBuilder
// ============================================================================

/// Builder for configuring a [`Discovery`] instance.
///
/// Use [`Discovery::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct DiscoveryBuilder {
    /// Transport and round options.
    options: DiscoveryOptions,
    /// Type filter applied to every round.
    filter: TargetFilter,
}

// ============================================================================
// DiscoveryBuilder Implementation
// ============================================================================

impl DiscoveryBuilder {
    /// Creates a new builder with default options and the page filter.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all options at once.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the port used when connection parameters have none.
    #[inline]
    #[must_use]
    pub fn default_port(mut self, port: u16) -> Self {
        self.options.default_port = port;
        self
    }

    /// Sets the discovery path (e.g. `/json/list`).
    #[inline]
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.options.path = path.into();
        self
    }

    /// Uses `https` for discovery requests.
    #[inline]
    #[must_use]
    pub fn secure(mut self) -> Self {
        self.options.secure = true;
        self
    }

    /// Sets the transport timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = timeout;
        self
    }

    /// Sets a deadline for the whole discovery round.
    #[inline]
    #[must_use]
    pub fn round_timeout(mut self, timeout: Duration) -> Self {
        self.options.round_timeout = Some(timeout);
        self
    }

    /// Sets whether loopback endpoints are rewritten for remote hosts.
    #[inline]
    #[must_use]
    pub fn rewrite_remote_endpoints(mut self, rewrite: bool) -> Self {
        self.options.rewrite_remote_endpoints = rewrite;
        self
    }

    /// Sets the type filter.
    #[inline]
    #[must_use]
    pub fn filter(mut self, filter: TargetFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builds the discovery with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the options are invalid
    /// - [`Error::Config`] if the HTTP client cannot be created
    pub fn build(self) -> Result<Discovery> {
        self.options.validate().map_err(Error::config)?;
        Discovery::new(self.options, self.filter)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let builder = DiscoveryBuilder::new();
        assert_eq!(builder.options, DiscoveryOptions::new());
        assert_eq!(builder.filter, TargetFilter::pages());
    }

    #[test]
    fn test_setters() {
        let builder = DiscoveryBuilder::new()
            .default_port(9229)
            .path("/json")
            .secure()
            .request_timeout(Duration::from_secs(1))
            .round_timeout(Duration::from_secs(3))
            .rewrite_remote_endpoints(false)
            .filter(TargetFilter::any());

        assert_eq!(builder.options.default_port, 9229);
        assert_eq!(builder.options.path, "/json");
        assert!(builder.options.secure);
        assert_eq!(builder.options.request_timeout, Duration::from_secs(1));
        assert_eq!(builder.options.round_timeout, Some(Duration::from_secs(3)));
        assert!(!builder.options.rewrite_remote_endpoints);
        assert_eq!(builder.filter, TargetFilter::any());
    }

    #[test]
    fn test_build_valid() {
        let discovery = DiscoveryBuilder::new().build().expect("defaults are valid");
        assert_eq!(discovery.options().default_port, 9222);
    }

    #[test]
    fn test_build_rejects_invalid_options() {
        let err = DiscoveryBuilder::new().path("json").build().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
