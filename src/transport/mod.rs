//! HTTP transport to the remote discovery endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Discovery      │         HTTP GET             │  Remote process │
//! │  (Rust)         │─────────────────────────────►│  (browser)      │
//! │                 │◄─────────────────────────────│                 │
//! │ DiscoveryClient │     JSON target array        │  /json/list     │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `client` | Discovery request and error classification |

// ============================================================================
// Submodules
// ============================================================================

/// Discovery endpoint client.
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::DiscoveryClient;
