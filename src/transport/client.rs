//! HTTP client for the discovery endpoint.
//!
//! One call to [`DiscoveryClient::fetch_targets`] is one `GET` request.
//! Every failure mode (refused connection, DNS, timeout, bad status,
//! malformed body) comes back as an [`Error`], never as a panic.

// ============================================================================
// Imports
// ============================================================================

use std::error::Error as StdError;
use std::io::ErrorKind;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::RawTargetEntry;

// ============================================================================
// DiscoveryClient
// ============================================================================

/// Fetches raw target lists from a remote debuggable process.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// `http` or `https`.
    scheme: &'static str,
    /// Discovery path, e.g. `/json/list`.
    path: String,
}

impl DiscoveryClient {
    /// Creates a client for the given scheme and discovery path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be created.
    pub fn new(secure: bool, path: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            scheme: if secure { "https" } else { "http" },
            path: path.into(),
        })
    }

    /// Builds the discovery URL for `host:port`.
    ///
    /// IPv6 literals are bracketed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `host` is empty
    /// - [`Error::InvalidUrl`] if the result is not a valid URL
    pub fn discovery_url(&self, host: &str, port: u16) -> Result<Url> {
        let host = host.trim();
        if host.is_empty() {
            return Err(Error::invalid_argument("host must not be empty"));
        }

        let authority = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };

        Ok(Url::parse(&format!(
            "{}://{}{}",
            self.scheme, authority, self.path
        ))?)
    }

    /// Requests the target list from `host:port`.
    ///
    /// # Arguments
    ///
    /// * `host` - Host of the remote process
    /// * `port` - Remote debugging port
    /// * `timeout` - Deadline for the whole request, body included
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionRefused`] if nothing listens on the port
    /// - [`Error::Connection`] on DNS or other connect failures
    /// - [`Error::Timeout`] if the request exceeds `timeout`
    /// - [`Error::HttpStatus`] on a non-success status
    /// - [`Error::Json`] if the body is not a JSON array
    pub async fn fetch_targets(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Vec<RawTargetEntry>> {
        let url = self.discovery_url(host, port)?;
        let endpoint = url.to_string();

        debug!(%endpoint, timeout_ms = timeout.as_millis() as u64, "Requesting target list");

        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, &endpoint, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), endpoint));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify(e, &endpoint, timeout))?;
        let entries: Vec<RawTargetEntry> = serde_json::from_slice(&body)?;

        debug!(%endpoint, count = entries.len(), "Target list received");

        Ok(entries)
    }
}

// ============================================================================
// Error Classification
// ============================================================================

/// Maps an HTTP client error onto the crate's transport errors.
fn classify(err: reqwest::Error, endpoint: &str, timeout: Duration) -> Error {
    if err.is_timeout() {
        return Error::timeout(format!("GET {endpoint}"), timeout.as_millis() as u64);
    }

    if err.is_connect() {
        if is_refused(&err) {
            return Error::connection_refused(endpoint);
        }
        return Error::connection(format!("{endpoint}: {err}"));
    }

    Error::Http(err)
}

/// Walks the source chain looking for a refused TCP connect.
fn is_refused(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>()
            && io.kind() == ErrorKind::ConnectionRefused
        {
            return true;
        }
        source = cause.source();
    }
    false
}

// ============================================================================
// Tests
// ============================================================================
