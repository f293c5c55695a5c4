//! Error types for DevTools target discovery.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use devtools_discovery::{ConnectionParams, Discovery, Result};
//!
//! async fn example() -> Result<()> {
//!     let discovery = Discovery::builder().build()?;
//!     let targets = discovery.list_targets(&ConnectionParams::default()).await?;
//!     println!("{} targets", targets.len());
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`], [`Error::InvalidUrl`] |
//! | Transport | [`Error::Connection`], [`Error::ConnectionRefused`], [`Error::Timeout`], [`Error::HttpStatus`], [`Error::Http`] |
//! | Response | [`Error::Json`] |
//! | Attach | [`Error::InvalidTransition`], [`Error::InvalidSelection`] |
//!
//! Empty candidate sets and cancelled selections are outcomes, not errors,
//! and have no variant here.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::attach::AttachState;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when discovery options are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument.
    ///
    /// Returned when connection parameters are invalid (e.g. empty host).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// Discovery URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Connection to the discovery endpoint failed.
    ///
    /// Covers DNS failures and other connect-phase errors.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Nothing is listening on the discovery endpoint.
    ///
    /// Usually means the debuggable process is not running yet.
    #[error("Connection refused: {endpoint}")]
    ConnectionRefused {
        /// Discovery URL that refused the connection.
        endpoint: String,
    },

    /// Operation timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Discovery endpoint answered with a non-success status.
    #[error("Unexpected HTTP status {status} from {endpoint}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Discovery URL that was requested.
        endpoint: String,
    },

    /// Other HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ========================================================================
    // Response Errors
    // ========================================================================
    /// Response body is not a JSON target array.
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Attach Errors
    // ========================================================================
    /// Event not allowed in the resolver's current state.
    #[error("Invalid transition: {event} while {from}")]
    InvalidTransition {
        /// State the resolver was in.
        from: AttachState,
        /// Event that was applied.
        event: &'static str,
    },

    /// Selected target is not among the offered candidates.
    #[error("Selected target is not a candidate: {endpoint}")]
    InvalidSelection {
        /// Attach endpoint of the rejected selection.
        endpoint: String,
    },
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection refused error.
    #[inline]
    pub fn connection_refused(endpoint: impl Into<String>) -> Self {
        Self::ConnectionRefused {
            endpoint: endpoint.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates an HTTP status error.
    #[inline]
    pub fn http_status(status: u16, endpoint: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            endpoint: endpoint.into(),
        }
    }

    /// Creates an invalid transition error.
    #[inline]
    pub fn invalid_transition(from: AttachState, event: &'static str) -> Self {
        Self::InvalidTransition { from, event }
    }

    /// Creates an invalid selection error.
    #[inline]
    pub fn invalid_selection(endpoint: impl Into<String>) -> Self {
        Self::InvalidSelection {
            endpoint: endpoint.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::Connection { .. } | Self::ConnectionRefused { .. } => true,
            Self::Http(e) => e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the remote process is most likely not running.
    ///
    /// Callers usually show a "target not running" message for these.
    #[inline]
    #[must_use]
    pub fn is_not_running(&self) -> bool {
        matches!(self, Self::ConnectionRefused { .. })
    }

    /// Returns `true` if the endpoint answered with something that is not
    /// a target list.
    #[inline]
    #[must_use]
    pub fn is_malformed_response(&self) -> bool {
        match self {
            Self::Json(_) => true,
            Self::Http(e) => e.is_decode(),
            _ => false,
        }
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed when the caller retries later.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_timeout()
            || self.is_connection_error()
            || matches!(self, Self::HttpStatus { status, .. } if *status >= 500)
    }
}

// ============================================================================
// Tests
// ============================================================================
