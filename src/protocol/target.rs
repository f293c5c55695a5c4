//! Discovery endpoint wire types.
//!
//! The remote process answers `GET /json/list` with a JSON array:
//!
//! ```json
//! [
//!   {
//!     "id": "8A5C1F0E",
//!     "type": "page",
//!     "title": "Tom &amp; Jerry",
//!     "url": "http://localhost:8080/",
//!     "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/page/8A5C1F0E",
//!     "devtoolsFrontendUrl": "/devtools/inspector.html?ws=...",
//!     "faviconUrl": "http://localhost:8080/favicon.ico",
//!     "description": ""
//!   }
//! ]
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::TargetId;

// ============================================================================
// Constants
// ============================================================================

/// Target type of user-facing pages.
pub const PAGE_TARGET_TYPE: &str = "page";

// ============================================================================
// RawTargetEntry
// ============================================================================

/// One entry of the discovery response, as received.
///
/// Parsing is lenient: a field missing or holding a non-string value reads
/// as `None`, and non-object entries read as entirely empty. This keeps a
/// single malformed entry from failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct RawTargetEntry {
    /// Target ID.
    pub id: Option<String>,
    /// Title, HTML-entity-escaped.
    pub title: Option<String>,
    /// Current URL of the target.
    pub url: Option<String>,
    /// Target type (`page`, `service_worker`, `iframe`, ...).
    pub target_type: Option<String>,
    /// Protocol endpoint used to attach.
    pub web_socket_debugger_url: Option<String>,
    /// DevTools frontend path for this target.
    pub devtools_frontend_url: Option<String>,
    /// Favicon URL.
    pub favicon_url: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

impl From<Value> for RawTargetEntry {
    fn from(value: Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);

        Self {
            id: field("id"),
            title: field("title"),
            url: field("url"),
            target_type: field("type"),
            web_socket_debugger_url: field("webSocketDebuggerUrl"),
            devtools_frontend_url: field("devtoolsFrontendUrl"),
            favicon_url: field("faviconUrl"),
            description: field("description"),
        }
    }
}

// ============================================================================
// DiscoveryTarget
// ============================================================================

/// A normalized, attachable target.
///
/// Only produced by normalization, so `web_socket_debugger_url` is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryTarget {
    /// Target ID, valid only within its discovery round.
    pub id: TargetId,
    /// Title as received (HTML-entity-escaped).
    pub title: String,
    /// Title with the five HTML entities unescaped.
    pub unescaped_title: String,
    /// Current URL of the target.
    pub url: String,
    /// Protocol endpoint used to attach.
    pub web_socket_debugger_url: String,
    /// Target type; empty when not reported.
    #[serde(rename = "type")]
    pub target_type: String,
    /// DevTools frontend path, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtools_frontend_url: Option<String>,
    /// Favicon URL, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    /// Description, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DiscoveryTarget {
    /// Returns the attach endpoint.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.web_socket_debugger_url
    }

    /// Returns `true` if this is a user-facing page target.
    #[inline]
    #[must_use]
    pub fn is_page(&self) -> bool {
        self.target_type == PAGE_TARGET_TYPE
    }

    /// Returns `true` if the remote process did not report a type.
    #[inline]
    #[must_use]
    pub fn is_untyped(&self) -> bool {
        self.target_type.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
