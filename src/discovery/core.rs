//! Discovery orchestration.
//!
//! One call to [`Discovery::discover`] is one discovery round:
//!
//! 1. Fetch the raw target list (single request, no retry)
//! 2. Normalize entries, dropping those without an attach endpoint
//! 3. Rewrite loopback endpoints for remote hosts (optional)
//! 4. Filter by type predicate and URL filter
//! 5. Drop duplicate endpoints
//! 6. Decide: zero → `Empty`, one → `Resolved`, more → `Candidates`
//!
//! Nothing is cached between rounds. Concurrent rounds share only the HTTP
//! connection pool.

// ============================================================================
// Imports
// ============================================================================

use tokio::time::timeout;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{DiscoveryTarget, RawTargetEntry};
use crate::transport::DiscoveryClient;

use super::builder::DiscoveryBuilder;
use super::filter::{TargetFilter, UrlPattern, dedup_by_endpoint, filter_targets};
use super::normalize::{normalize_all, rewrite_remote_endpoint};
use super::options::DiscoveryOptions;
use super::params::ConnectionParams;

// ============================================================================
// DiscoveryResult
// ============================================================================

/// Outcome of one discovery round.
#[derive(Debug)]
pub enum DiscoveryResult {
    /// Exactly one candidate; attach to it directly.
    Resolved(DiscoveryTarget),
    /// Several candidates in discovery order; a choice is needed.
    Candidates(Vec<DiscoveryTarget>),
    /// No candidate survived normalization and filtering.
    Empty,
    /// The round failed before producing a target list.
    TransportFailure(Error),
}

impl DiscoveryResult {
    /// Applies the zero/one/many decision to a filtered list.
    #[must_use]
    pub fn from_candidates(mut targets: Vec<DiscoveryTarget>) -> Self {
        if targets.len() > 1 {
            Self::Candidates(targets)
        } else {
            targets.pop().map_or(Self::Empty, Self::Resolved)
        }
    }

    /// Returns the attach endpoint if the round resolved to one target.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Resolved(target) => Some(target.endpoint()),
            _ => None,
        }
    }

    /// Returns the number of targets carried by this result.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Resolved(_) => 1,
            Self::Candidates(targets) => targets.len(),
            Self::Empty | Self::TransportFailure(_) => 0,
        }
    }

    /// Returns `true` if no targets are carried.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the round failed.
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Discovers attachable targets on a remote debuggable process.
///
/// Cheap to clone. Each round is independent; share one instance freely.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// HTTP client for the discovery endpoint.
    client: DiscoveryClient,
    /// Transport and round options.
    options: DiscoveryOptions,
    /// Type filter applied by [`discover`](Self::discover).
    filter: TargetFilter,
}

impl Discovery {
    /// Creates a discovery builder.
    #[inline]
    #[must_use]
    pub fn builder() -> DiscoveryBuilder {
        DiscoveryBuilder::new()
    }

    /// Creates a discovery from validated options.
    pub(crate) fn new(options: DiscoveryOptions, filter: TargetFilter) -> Result<Self> {
        let client = DiscoveryClient::new(options.secure, options.path.clone())?;
        Ok(Self {
            client,
            options,
            filter,
        })
    }

    /// Returns the options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Returns the configured type filter.
    #[inline]
    #[must_use]
    pub fn filter(&self) -> &TargetFilter {
        &self.filter
    }
}

// ============================================================================
// Discovery Rounds
// ============================================================================

impl Discovery {
    /// Runs one discovery round with the configured type filter.
    ///
    /// Never fails: transport errors come back as
    /// [`DiscoveryResult::TransportFailure`].
    pub async fn discover(&self, params: &ConnectionParams) -> DiscoveryResult {
        self.discover_with(params, |t| self.filter.matches(t)).await
    }

    /// Runs one discovery round with a caller-supplied predicate.
    ///
    /// The URL filter from `params` still applies on top of `predicate`.
    pub async fn discover_with<F>(&self, params: &ConnectionParams, predicate: F) -> DiscoveryResult
    where
        F: Fn(&DiscoveryTarget) -> bool,
    {
        match self.list_targets_with(params, predicate).await {
            Ok(targets) => DiscoveryResult::from_candidates(targets),
            Err(e) => {
                debug!(host = params.host(), error = %e, "Discovery round failed");
                DiscoveryResult::TransportFailure(e)
            }
        }
    }

    /// Lists every candidate of one round without the zero/one/many decision.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `params` are invalid
    /// - Any transport error from [`DiscoveryClient::fetch_targets`]
    /// - [`Error::Timeout`] if the round deadline passes
    pub async fn list_targets(&self, params: &ConnectionParams) -> Result<Vec<DiscoveryTarget>> {
        self.list_targets_with(params, |t| self.filter.matches(t))
            .await
    }

    /// Lists every candidate of one round using `predicate` as type filter.
    ///
    /// # Errors
    ///
    /// Same as [`list_targets`](Self::list_targets).
    pub async fn list_targets_with<F>(
        &self,
        params: &ConnectionParams,
        predicate: F,
    ) -> Result<Vec<DiscoveryTarget>>
    where
        F: Fn(&DiscoveryTarget) -> bool,
    {
        params.validate()?;
        let url_pattern = params.url_filter().map(UrlPattern::new).transpose()?;

        let host = params.host();
        let port = params.port().unwrap_or(self.options.default_port);

        let raw = self.fetch_round(host, port).await?;
        let received = raw.len();

        let mut targets = normalize_all(raw);
        let attachable = targets.len();

        if self.options.rewrite_remote_endpoints {
            for target in &mut targets {
                if let Some(endpoint) = rewrite_remote_endpoint(&target.web_socket_debugger_url, host)
                {
                    target.web_socket_debugger_url = endpoint;
                }
            }
        }

        let targets = filter_targets(targets, |t| {
            predicate(t)
                && url_pattern
                    .as_ref()
                    .is_none_or(|pattern| pattern.matches(&t.url))
        });
        let targets = dedup_by_endpoint(targets);

        debug!(
            host,
            port,
            received,
            attachable,
            candidates = targets.len(),
            "Discovery round complete"
        );

        Ok(targets)
    }

    /// Fetches the raw list, bounded by the round deadline if one is set.
    async fn fetch_round(&self, host: &str, port: u16) -> Result<Vec<RawTargetEntry>> {
        let fetch = self
            .client
            .fetch_targets(host, port, self.options.request_timeout);

        match self.options.round_timeout {
            Some(limit) => timeout(limit, fetch)
                .await
                .map_err(|_| Error::timeout("discovery round", limit.as_millis() as u64))?,
            None => fetch.await,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
