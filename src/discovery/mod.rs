//! Target discovery.
//!
//! This module turns a `(host, port, urlFilter)` triple into a
//! [`DiscoveryResult`].
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Discovery`] | Runs discovery rounds |
//! | [`DiscoveryBuilder`] | Fluent configuration builder |
//! | [`DiscoveryOptions`] | Ports, paths and timeouts |
//! | [`ConnectionParams`] | Per-round input |
//! | [`TargetFilter`] | Type predicate |
//! | [`UrlPattern`] | URL restriction |
//!
//! # Example
//!
//! ```no_run
//! use devtools_discovery::{ConnectionParams, Discovery, DiscoveryResult};
//!
//! # async fn example() -> devtools_discovery::Result<()> {
//! let discovery = Discovery::builder().build()?;
//! let params = ConnectionParams::new("127.0.0.1").with_port(9222);
//!
//! match discovery.discover(&params).await {
//!     DiscoveryResult::Resolved(target) => println!("attach to {}", target.endpoint()),
//!     DiscoveryResult::Candidates(targets) => println!("{} targets to choose from", targets.len()),
//!     DiscoveryResult::Empty => println!("no debuggable targets found"),
//!     DiscoveryResult::TransportFailure(e) => println!("target not running? {e}"),
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for [`Discovery`].
pub mod builder;

/// Discovery rounds and the zero/one/many decision.
pub mod core;

/// Type predicates, URL patterns and deduplication.
pub mod filter;

/// Raw entry normalization and endpoint rewriting.
pub mod normalize;

/// Discovery options.
pub mod options;

/// Per-round connection parameters.
pub mod params;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::DiscoveryBuilder;
pub use self::core::{Discovery, DiscoveryResult};
pub use filter::{TargetFilter, UrlPattern, dedup_by_endpoint, filter_targets};
pub use normalize::{normalize, normalize_all, rewrite_remote_endpoint, unescape_title};
pub use options::{DEFAULT_PATH, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT, DiscoveryOptions};
pub use params::{ConnectionParams, DEFAULT_HOST};
