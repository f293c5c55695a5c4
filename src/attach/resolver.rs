//! Attach resolution state machine.
//!
//! ```text
//!            discover: one            ┌──────────┐
//!        ┌───────────────────────────►│ Resolved │◄──────────┐
//!        │                            └──────────┘  selected │
//!  ┌──────┐  discover: many  ┌───────────────────┐           │
//!  │ Idle │─────────────────►│ AwaitingSelection │───────────┘
//!  └──────┘                  └───────────────────┘
//!    │  │   discover: none   ┌───────┐    │ cancelled / timeout
//!    │  └───────────────────►│ Empty │    ▼
//!    │                       └───────┘ ┌───────────┐
//!    │ discover: failed                │ Cancelled │
//!    ▼                                 └───────────┘
//!  ┌────────┐
//!  │ Failed │
//!  └────────┘
//! ```
//!
//! Every state except `Idle` and `AwaitingSelection` is terminal; a new
//! attach attempt needs a new [`AttachResolver`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::mem;
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use crate::discovery::{ConnectionParams, Discovery, DiscoveryResult};
use crate::error::{Error, Result};
use crate::protocol::DiscoveryTarget;

use super::selection::{AttachSelection, TargetPicker};

// ============================================================================
// AttachState
// ============================================================================

/// Observable state of an [`AttachResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachState {
    /// No discovery result applied yet.
    Idle,
    /// Several candidates; waiting for the collaborator.
    AwaitingSelection,
    /// An attach endpoint was chosen.
    Resolved,
    /// Discovery found no candidates.
    Empty,
    /// The collaborator cancelled or did not answer in time.
    Cancelled,
    /// Discovery or selection failed.
    Failed,
}

impl AttachState {
    /// Returns `true` if no further transition exists.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Idle | Self::AwaitingSelection)
    }
}

impl fmt::Display for AttachState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::AwaitingSelection => "AwaitingSelection",
            Self::Resolved => "Resolved",
            Self::Empty => "Empty",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// AttachOutcome
// ============================================================================

/// Final result of an attach attempt.
#[derive(Debug)]
pub enum AttachOutcome {
    /// Attach to this target.
    Attach(DiscoveryTarget),
    /// No debuggable targets were found.
    NoTargets,
    /// The selection was cancelled; abort the attach quietly.
    Cancelled,
    /// Discovery or selection failed.
    Failed(Error),
}

impl AttachOutcome {
    /// Returns the attach endpoint, if one was chosen.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Attach(target) => Some(target.endpoint()),
            _ => None,
        }
    }

    /// Returns the terminal state this outcome corresponds to.
    #[must_use]
    pub const fn state(&self) -> AttachState {
        match self {
            Self::Attach(_) => AttachState::Resolved,
            Self::NoTargets => AttachState::Empty,
            Self::Cancelled => AttachState::Cancelled,
            Self::Failed(_) => AttachState::Failed,
        }
    }
}

// ============================================================================
// AttachResolver
// ============================================================================

/// Internal phase; candidates live here only while awaiting a choice.
#[derive(Debug)]
enum Phase {
    Idle,
    AwaitingSelection(Vec<DiscoveryTarget>),
    Finished(AttachState),
}

/// Drives one attach attempt from discovery result to outcome.
///
/// # Example
///
/// ```no_run
/// use devtools_discovery::{
///     AttachOutcome, AttachResolver, ChannelPicker, ConnectionParams, Discovery,
/// };
///
/// # async fn example() -> devtools_discovery::Result<()> {
/// let discovery = Discovery::builder().build()?;
/// let (picker, mut requests) = ChannelPicker::channel();
///
/// tokio::spawn(async move {
///     while let Some(request) = requests.recv().await {
///         request.select(0);
///     }
/// });
///
/// let outcome = AttachResolver::new()
///     .resolve(&discovery, &ConnectionParams::default(), &picker)
///     .await;
///
/// if let AttachOutcome::Attach(target) = outcome {
///     println!("attach to {}", target.endpoint());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AttachResolver {
    /// Current phase.
    phase: Phase,
    /// How long the collaborator may take before the choice counts as
    /// cancelled.
    selection_timeout: Option<Duration>,
}

impl Default for AttachResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AttachResolver {
    /// Creates an idle resolver without a selection timeout.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            selection_timeout: None,
        }
    }

    /// Sets the selection timeout.
    #[inline]
    #[must_use]
    pub fn with_selection_timeout(mut self, limit: Duration) -> Self {
        self.selection_timeout = Some(limit);
        self
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> AttachState {
        match &self.phase {
            Phase::Idle => AttachState::Idle,
            Phase::AwaitingSelection(_) => AttachState::AwaitingSelection,
            Phase::Finished(state) => *state,
        }
    }

    /// Returns the candidates awaiting a choice; empty in any other state.
    #[must_use]
    pub fn candidates(&self) -> &[DiscoveryTarget] {
        match &self.phase {
            Phase::AwaitingSelection(candidates) => candidates,
            _ => &[],
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

impl AttachResolver {
    /// Applies a discovery result.
    ///
    /// Returns the outcome when the result settles the attempt, or `None`
    /// when a selection is now awaited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the resolver is idle.
    pub fn begin(&mut self, result: DiscoveryResult) -> Result<Option<AttachOutcome>> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(Error::invalid_transition(self.state(), "discover"));
        }

        let outcome = match result {
            DiscoveryResult::Candidates(candidates) if candidates.len() > 1 => {
                debug!(count = candidates.len(), "Awaiting target selection");
                self.phase = Phase::AwaitingSelection(candidates);
                return Ok(None);
            }
            DiscoveryResult::Candidates(candidates) => {
                return self.begin(DiscoveryResult::from_candidates(candidates));
            }
            DiscoveryResult::Resolved(target) => AttachOutcome::Attach(target),
            DiscoveryResult::Empty => AttachOutcome::NoTargets,
            DiscoveryResult::TransportFailure(e) => AttachOutcome::Failed(e),
        };

        self.phase = Phase::Finished(outcome.state());
        Ok(Some(outcome))
    }

    /// Applies the collaborator's answer.
    ///
    /// A selected target must be one of the candidates, matched by attach
    /// endpoint; otherwise the attempt fails with [`Error::InvalidSelection`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless a selection is awaited.
    pub fn select(&mut self, selection: AttachSelection) -> Result<AttachOutcome> {
        let candidates = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::AwaitingSelection(candidates) => candidates,
            other => {
                self.phase = other;
                return Err(Error::invalid_transition(self.state(), "select"));
            }
        };

        let outcome = match selection {
            AttachSelection::Cancelled => AttachOutcome::Cancelled,
            AttachSelection::Selected(chosen) => candidates
                .into_iter()
                .find(|c| c.web_socket_debugger_url == chosen.web_socket_debugger_url)
                .map_or_else(
                    || AttachOutcome::Failed(Error::invalid_selection(chosen.endpoint())),
                    AttachOutcome::Attach,
                ),
        };

        debug!(state = %outcome.state(), "Selection applied");
        self.phase = Phase::Finished(outcome.state());
        Ok(outcome)
    }

    /// Abandons a pending selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless a selection is awaited.
    #[inline]
    pub fn abandon(&mut self) -> Result<AttachOutcome> {
        self.select(AttachSelection::Cancelled)
    }
}

// ============================================================================
// Full Attempt
// ============================================================================

impl AttachResolver {
    /// Runs a whole attach attempt: one discovery round, then a choice by
    /// `picker` if several candidates remain.
    ///
    /// A picker that exceeds the selection timeout counts as cancelled.
    /// Dropping the returned future abandons the attempt without side
    /// effects.
    pub async fn resolve<P>(
        mut self,
        discovery: &Discovery,
        params: &ConnectionParams,
        picker: &P,
    ) -> AttachOutcome
    where
        P: TargetPicker + ?Sized,
    {
        let result = discovery.discover(params).await;

        match self.begin(result) {
            Ok(Some(outcome)) => return outcome,
            Ok(None) => {}
            Err(e) => return AttachOutcome::Failed(e),
        }

        let pick = picker.pick(self.candidates());
        let selection = match self.selection_timeout {
            Some(limit) => timeout(limit, pick).await.unwrap_or_else(|_| {
                debug!(timeout_ms = limit.as_millis() as u64, "Selection timed out");
                AttachSelection::Cancelled
            }),
            None => pick.await,
        };

        self.select(selection).unwrap_or_else(AttachOutcome::Failed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::discovery::TargetFilter;
    use crate::identifiers::TargetId;
    use crate::test_support::{StubResponse, closed_port, serve_once};

    fn target(id: &str) -> DiscoveryTarget {
        DiscoveryTarget {
            id: TargetId::new(id),
            title: id.to_string(),
            unescaped_title: id.to_string(),
            url: format!("http://localhost/{id}"),
            web_socket_debugger_url: format!("ws://127.0.0.1:9222/devtools/page/{id}"),
            target_type: "page".to_string(),
            devtools_frontend_url: None,
            favicon_url: None,
            description: None,
        }
    }

    fn awaiting() -> AttachResolver {
        let mut resolver = AttachResolver::new();
        let step = resolver
            .begin(DiscoveryResult::Candidates(vec![target("a"), target("b")]))
            .expect("idle accepts discovery");
        assert!(step.is_none());
        resolver
    }

    struct PickIndex(usize);

    #[async_trait]
    impl TargetPicker for PickIndex {
        async fn pick(&self, candidates: &[DiscoveryTarget]) -> AttachSelection {
            candidates.get(self.0).cloned().into()
        }
    }

    struct NeverAnswers;

    #[async_trait]
    impl TargetPicker for NeverAnswers {
        async fn pick(&self, _candidates: &[DiscoveryTarget]) -> AttachSelection {
            std::future::pending().await
        }
    }

    #[test]
    fn test_idle_resolved() {
        let mut resolver = AttachResolver::new();
        let outcome = resolver
            .begin(DiscoveryResult::Resolved(target("a")))
            .expect("valid transition")
            .expect("settled");

        assert_eq!(outcome.endpoint(), Some("ws://127.0.0.1:9222/devtools/page/a"));
        assert_eq!(resolver.state(), AttachState::Resolved);
    }

    #[test]
    fn test_idle_awaiting_selection() {
        let resolver = awaiting();
        assert_eq!(resolver.state(), AttachState::AwaitingSelection);
        assert_eq!(resolver.candidates().len(), 2);
    }

    #[test]
    fn test_single_candidate_list_resolves() {
        let mut resolver = AttachResolver::new();
        let outcome = resolver
            .begin(DiscoveryResult::Candidates(vec![target("a")]))
            .expect("valid transition");

        assert!(matches!(outcome, Some(AttachOutcome::Attach(_))));
        assert_eq!(resolver.state(), AttachState::Resolved);
    }

    #[test]
    fn test_empty_is_not_cancelled() {
        let mut resolver = AttachResolver::new();
        let outcome = resolver
            .begin(DiscoveryResult::Empty)
            .expect("valid transition");

        assert!(matches!(outcome, Some(AttachOutcome::NoTargets)));
        assert_eq!(resolver.state(), AttachState::Empty);
    }

    #[test]
    fn test_transport_failure() {
        let mut resolver = AttachResolver::new();
        let outcome = resolver
            .begin(DiscoveryResult::TransportFailure(Error::connection_refused(
                "http://127.0.0.1:9222/json/list",
            )))
            .expect("valid transition");

        assert!(matches!(outcome, Some(AttachOutcome::Failed(ref e)) if e.is_not_running()));
        assert_eq!(resolver.state(), AttachState::Failed);
    }

    #[test]
    fn test_selection_resolves() {
        let mut resolver = awaiting();
        let outcome = resolver
            .select(AttachSelection::Selected(target("b")))
            .expect("valid transition");

        assert_eq!(outcome.endpoint(), Some("ws://127.0.0.1:9222/devtools/page/b"));
        assert_eq!(resolver.state(), AttachState::Resolved);
        assert!(resolver.candidates().is_empty());
    }

    #[test]
    fn test_cancellation_always_cancelled() {
        let mut resolver = awaiting();
        let outcome = resolver.abandon().expect("valid transition");

        assert!(matches!(outcome, AttachOutcome::Cancelled));
        assert_eq!(resolver.state(), AttachState::Cancelled);
        assert!(resolver.candidates().is_empty());
    }

    #[test]
    fn test_unknown_selection_fails() {
        let mut resolver = awaiting();
        let outcome = resolver
            .select(AttachSelection::Selected(target("zzz")))
            .expect("valid transition");

        assert!(matches!(
            outcome,
            AttachOutcome::Failed(Error::InvalidSelection { .. })
        ));
        assert_eq!(resolver.state(), AttachState::Failed);
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        let mut resolver = awaiting();
        resolver.abandon().expect("valid transition");

        let err = resolver
            .select(AttachSelection::Selected(target("a")))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: AttachState::Cancelled,
                event: "select"
            }
        ));

        let err = resolver.begin(DiscoveryResult::Empty).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(resolver.state(), AttachState::Cancelled);
    }

    #[test]
    fn test_select_while_idle_is_invalid() {
        let mut resolver = AttachResolver::new();
        assert!(resolver.abandon().is_err());
        assert_eq!(resolver.state(), AttachState::Idle);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AttachState::Idle.is_terminal());
        assert!(!AttachState::AwaitingSelection.is_terminal());
        assert!(AttachState::Resolved.is_terminal());
        assert!(AttachState::Empty.is_terminal());
        assert!(AttachState::Cancelled.is_terminal());
        assert!(AttachState::Failed.is_terminal());
    }

    fn three_entries_one_unattachable() -> String {
        r#"[
            {"id": "1", "type": "page", "title": "One", "url": "http://a/",
             "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/page/1"},
            {"id": "2", "type": "page", "title": "Two", "url": "http://b/"},
            {"id": "3", "type": "page", "title": "Three", "url": "http://c/",
             "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/page/3"}
        ]"#
        .to_string()
    }

    #[tokio::test]
    async fn test_resolve_with_picker() {
        let stub = serve_once(StubResponse::ok(three_entries_one_unattachable())).await;
        let discovery = Discovery::builder()
            .filter(TargetFilter::any())
            .build()
            .expect("discovery builds");
        let params = ConnectionParams::default().with_port(stub.port);

        let outcome = AttachResolver::new()
            .resolve(&discovery, &params, &PickIndex(1))
            .await;

        assert_eq!(outcome.endpoint(), Some("ws://127.0.0.1:9222/devtools/page/3"));
    }

    #[tokio::test]
    async fn test_resolve_picker_cancels() {
        let stub = serve_once(StubResponse::ok(three_entries_one_unattachable())).await;
        let discovery = Discovery::builder().build().expect("discovery builds");
        let params = ConnectionParams::default().with_port(stub.port);

        let outcome = AttachResolver::new()
            .resolve(&discovery, &params, &PickIndex(9))
            .await;

        assert!(matches!(outcome, AttachOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_resolve_selection_timeout_cancels() {
        let stub = serve_once(StubResponse::ok(three_entries_one_unattachable())).await;
        let discovery = Discovery::builder().build().expect("discovery builds");
        let params = ConnectionParams::default().with_port(stub.port);

        let outcome = AttachResolver::new()
            .with_selection_timeout(Duration::from_millis(50))
            .resolve(&discovery, &params, &NeverAnswers)
            .await;

        assert!(matches!(outcome, AttachOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_resolve_not_running() {
        let port = closed_port().await;
        let discovery = Discovery::builder().build().expect("discovery builds");
        let params = ConnectionParams::default().with_port(port);

        let outcome = AttachResolver::new()
            .resolve(&discovery, &params, &NeverAnswers)
            .await;

        assert_eq!(outcome.state(), AttachState::Failed);
    }
}
