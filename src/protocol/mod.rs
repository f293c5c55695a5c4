//! Discovery endpoint message types.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | `GET {path}` | Local → Remote | Request the target list |
//! | `[RawTargetEntry]` | Remote → Local | Inspectable targets |
//!
//! The discovery endpoint is the only wire format this crate parses. The
//! returned `webSocketDebuggerUrl` is handed to the caller untouched apart
//! from optional remote host rewriting.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `target` | Raw and normalized target records |

// ============================================================================
// Submodules
// ============================================================================

/// Raw and normalized target records.
pub mod target;

// ============================================================================
// Re-exports
// ============================================================================

pub use target::{DiscoveryTarget, PAGE_TARGET_TYPE, RawTargetEntry};
