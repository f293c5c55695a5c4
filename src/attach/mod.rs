//! Attach resolution.
//!
//! Applies the zero/one/many policy to a discovery result and, when several
//! candidates remain, hands the choice to an external [`TargetPicker`].
//!
//! # Outcomes
//!
//! | Outcome | Meaning for the caller |
//! |---------|------------------------|
//! | [`AttachOutcome::Attach`] | Attach to the endpoint |
//! | [`AttachOutcome::NoTargets`] | "No debuggable targets found" |
//! | [`AttachOutcome::Cancelled`] | Abort quietly; not an error |
//! | [`AttachOutcome::Failed`] | Surface the cause (often "target not running") |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `resolver` | State machine and full attach attempt |
//! | `selection` | Picker trait, selections and presentation items |

// ============================================================================
// Submodules
// ============================================================================

/// Attach state machine.
pub mod resolver;

/// Disambiguation types.
pub mod selection;

// ============================================================================
// Re-exports
// ============================================================================

pub use resolver::{AttachOutcome, AttachResolver, AttachState};
pub use selection::{
    AttachSelection, ChannelPicker, SelectionItem, SelectionRequest, TargetPicker,
    selection_items,
};
