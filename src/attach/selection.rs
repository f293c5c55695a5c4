//! Disambiguation between several candidates.
//!
//! The choice itself belongs to an external collaborator (a quick-pick list,
//! a terminal prompt, a test). It implements [`TargetPicker`] and answers
//! with an [`AttachSelection`].
//!
//! [`ChannelPicker`] bridges to a collaborator running elsewhere (e.g. a UI
//! task): each pick becomes a [`SelectionRequest`] on a channel, and dropping
//! the request counts as cancellation.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::protocol::DiscoveryTarget;

// ============================================================================
// AttachSelection
// ============================================================================

/// Answer of the external collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachSelection {
    /// The collaborator chose this target.
    Selected(DiscoveryTarget),
    /// The collaborator declined to choose.
    Cancelled,
}

impl From<Option<DiscoveryTarget>> for AttachSelection {
    fn from(target: Option<DiscoveryTarget>) -> Self {
        target.map_or(Self::Cancelled, Self::Selected)
    }
}

// ============================================================================
// SelectionItem
// ============================================================================

/// Presentation form of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionItem {
    /// Unescaped title, or the URL when the title is empty.
    pub label: String,
    /// Target URL.
    pub detail: String,
    /// Attach endpoint.
    pub endpoint: String,
}

impl SelectionItem {
    /// Builds the item shown for `target`.
    #[must_use]
    pub fn from_target(target: &DiscoveryTarget) -> Self {
        let label = if target.unescaped_title.trim().is_empty() {
            target.url.clone()
        } else {
            target.unescaped_title.clone()
        };

        Self {
            label,
            detail: target.url.clone(),
            endpoint: target.web_socket_debugger_url.clone(),
        }
    }
}

/// Builds presentation items for `candidates`, in order.
#[must_use]
pub fn selection_items(candidates: &[DiscoveryTarget]) -> Vec<SelectionItem> {
    candidates.iter().map(SelectionItem::from_target).collect()
}

// ============================================================================
// TargetPicker
// ============================================================================

/// External collaborator that chooses among several candidates.
#[async_trait]
pub trait TargetPicker: Send + Sync {
    /// Chooses one of `candidates` or cancels.
    ///
    /// `candidates` always holds at least two targets, in discovery order.
    async fn pick(&self, candidates: &[DiscoveryTarget]) -> AttachSelection;
}

// ============================================================================
// ChannelPicker
// ============================================================================

/// One pending choice, delivered to the collaborator over a channel.
#[derive(Debug)]
pub struct SelectionRequest {
    /// Candidates in discovery order.
    candidates: Vec<DiscoveryTarget>,
    /// Reply slot.
    reply: oneshot::Sender<AttachSelection>,
}

impl SelectionRequest {
    /// Returns the candidates.
    #[inline]
    #[must_use]
    pub fn candidates(&self) -> &[DiscoveryTarget] {
        &self.candidates
    }

    /// Returns presentation items for the candidates.
    #[must_use]
    pub fn items(&self) -> Vec<SelectionItem> {
        selection_items(&self.candidates)
    }

    /// Chooses the candidate at `index`.
    ///
    /// An out-of-range index cancels.
    pub fn select(mut self, index: usize) -> bool {
        let selection = if index < self.candidates.len() {
            AttachSelection::Selected(self.candidates.swap_remove(index))
        } else {
            AttachSelection::Cancelled
        };
        self.reply.send(selection).is_ok()
    }

    /// Cancels the choice.
    pub fn cancel(self) -> bool {
        self.reply.send(AttachSelection::Cancelled).is_ok()
    }
}

/// [`TargetPicker`] that forwards each choice to a channel.
#[derive(Debug, Clone)]
pub struct ChannelPicker {
    requests: mpsc::UnboundedSender<SelectionRequest>,
}

impl ChannelPicker {
    /// Creates a picker and the receiver the collaborator listens on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SelectionRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { requests }, rx)
    }
}

#[async_trait]
impl TargetPicker for ChannelPicker {
    async fn pick(&self, candidates: &[DiscoveryTarget]) -> AttachSelection {
        let (reply, rx) = oneshot::channel();
        let request = SelectionRequest {
            candidates: candidates.to_vec(),
            reply,
        };

        if self.requests.send(request).is_err() {
            debug!("Selection receiver closed, treating as cancellation");
            return AttachSelection::Cancelled;
        }

        rx.await.unwrap_or_else(|_| {
            debug!("Selection request dropped, treating as cancellation");
            AttachSelection::Cancelled
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
