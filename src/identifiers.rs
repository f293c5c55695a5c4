//! Type-safe identifiers for discovered targets.
//!
//! Target IDs are assigned by the remote process and are only meaningful
//! within the discovery round that reported them.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// TargetId
// ============================================================================

/// Identifier of a single inspectable target (e.g. a browser tab).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Creates a target ID from the value reported by the remote process.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the remote process did not report an ID.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    #[inline]
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TargetId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_raw_value() {
        let id = TargetId::new("8A5C1F0E");
        assert_eq!(id.to_string(), "8A5C1F0E");
        assert_eq!(id.as_str(), "8A5C1F0E");
    }

    #[test]
    fn test_serde_transparent() {
        let id: TargetId = serde_json::from_str("\"abc\"").expect("valid json");
        assert_eq!(id, TargetId::from("abc"));
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"abc\"");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(TargetId::default().is_empty());
    }
}
