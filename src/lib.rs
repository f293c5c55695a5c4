//! DevTools Discovery - remote debug-target discovery and attach resolution.
//!
//! This library finds the inspectable targets (tabs, workers, webviews) a
//! remote debuggable process exposes on its DevTools HTTP endpoint, and
//! resolves a single attach endpoint among them.
//!
//! # Architecture
//!
//! One attach attempt flows through these stages:
//!
//! - **Transport**: `GET /json/list` on `host:port`, parse the JSON array
//! - **Normalize**: unescape titles, drop entries without an attach endpoint
//! - **Filter**: keep accepted types and URLs, in discovery order
//! - **Decide**: zero → empty, one → resolved, many → candidates
//! - **Resolve**: ask an external picker to choose among candidates
//!
//! Key design principles:
//!
//! - Every round is fresh; nothing is cached between rounds
//! - Failures are typed results, never panics
//! - An empty target list, a cancelled choice and a failure stay distinct
//!
//! # Quick Start
//!
//! ```no_run
//! use devtools_discovery::{AttachOutcome, AttachResolver, ChannelPicker, ConnectionParams, Discovery, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let discovery = Discovery::builder().build()?;
//!     let params = ConnectionParams::new("127.0.0.1")
//!         .with_port(9222)
//!         .with_url_filter("http://localhost:8080");
//!
//!     // Answer choices from another task
//!     let (picker, mut requests) = ChannelPicker::channel();
//!     tokio::spawn(async move {
//!         while let Some(request) = requests.recv().await {
//!             request.select(0);
//!         }
//!     });
//!
//!     match AttachResolver::new().resolve(&discovery, &params, &picker).await {
//!         AttachOutcome::Attach(target) => println!("attach to {}", target.endpoint()),
//!         AttachOutcome::NoTargets => println!("no debuggable targets found"),
//!         AttachOutcome::Cancelled => {}
//!         AttachOutcome::Failed(e) => println!("discovery failed: {e}"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`attach`] | Attach state machine and target pickers |
//! | [`discovery`] | Discovery rounds, filtering, normalization |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Discovery endpoint wire types |
//! | [`transport`] | HTTP transport layer |

// ============================================================================
// Modules
// ============================================================================

/// Attach resolution.
///
/// - [`AttachResolver`] - Zero/one/many policy and selection state machine
/// - [`TargetPicker`] - External collaborator choosing among candidates
pub mod attach;

/// Discovery rounds.
///
/// Use [`Discovery::builder()`] to create a configured instance.
pub mod discovery;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for discovered targets.
pub mod identifiers;

/// Discovery endpoint wire types.
pub mod protocol;

/// HTTP transport layer.
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

// Attach types
pub use attach::{
    AttachOutcome, AttachResolver, AttachSelection, AttachState, ChannelPicker, SelectionItem,
    SelectionRequest, TargetPicker,
};

// Discovery types
pub use discovery::{
    ConnectionParams, Discovery, DiscoveryBuilder, DiscoveryOptions, DiscoveryResult,
    TargetFilter, UrlPattern,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::TargetId;

// Protocol types
pub use protocol::{DiscoveryTarget, RawTargetEntry};

// Transport types
pub use transport::DiscoveryClient;
