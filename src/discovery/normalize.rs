//! Raw entry normalization.
//!
//! Turns [`RawTargetEntry`] values into [`DiscoveryTarget`]s. Entries without
//! an attach endpoint are dropped here; they are usually internal pages the
//! remote process lists but does not let clients attach to.

// ============================================================================
// Imports
// ============================================================================

use std::net::IpAddr;

use tracing::trace;
use url::Url;

use crate::identifiers::TargetId;
use crate::protocol::{DiscoveryTarget, RawTargetEntry};

// ============================================================================
// Constants
// ============================================================================

/// Entity table, in substitution priority order.
const TITLE_ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&#39;", "'"),
    ("&quot;", "\""),
];

// ============================================================================
// Title Unescaping
// ============================================================================

/// Unescapes the five HTML entities remote processes use in target titles.
///
/// Single left-to-right pass: text produced by one substitution is never
/// scanned again, so `&amp;lt;` becomes `&lt;`, not `<`. Anything outside
/// the table (numeric references included) is kept verbatim.
///
/// # Example
///
/// ```
/// use devtools_discovery::discovery::unescape_title;
///
/// assert_eq!(unescape_title("Tom &amp; Jerry"), "Tom & Jerry");
/// assert_eq!(unescape_title("A &amp;lt; B"), "A &lt; B");
/// ```
#[must_use]
pub fn unescape_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut rest = title;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match TITLE_ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity))
        {
            Some((entity, text)) => {
                out.push_str(text);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// ============================================================================
// Normalization
// ============================================================================

/// Converts one raw entry into a target.
///
/// Returns `None` if the entry has no non-empty `webSocketDebuggerUrl`.
/// Other missing fields become empty strings.
#[must_use]
pub fn normalize(raw: RawTargetEntry) -> Option<DiscoveryTarget> {
    let web_socket_debugger_url = raw
        .web_socket_debugger_url
        .filter(|endpoint| !endpoint.trim().is_empty())?;

    let title = raw.title.unwrap_or_default();
    let unescaped_title = unescape_title(&title);

    Some(DiscoveryTarget {
        id: raw.id.map(TargetId::from).unwrap_or_default(),
        title,
        unescaped_title,
        url: raw.url.unwrap_or_default(),
        web_socket_debugger_url,
        target_type: raw.target_type.unwrap_or_default(),
        devtools_frontend_url: raw.devtools_frontend_url,
        favicon_url: raw.favicon_url,
        description: raw.description,
    })
}

/// Normalizes every entry, preserving order and dropping non-attachable ones.
#[must_use]
pub fn normalize_all(entries: impl IntoIterator<Item = RawTargetEntry>) -> Vec<DiscoveryTarget> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let id = raw.id.clone();
            let target = normalize(raw);
            if target.is_none() {
                trace!(index, id = ?id, "Dropping entry without attach endpoint");
            }
            target
        })
        .collect()
}

// ============================================================================
// Remote Endpoint Rewriting
// ============================================================================

/// Points a loopback attach endpoint at the host discovery was sent to.
///
/// Remote processes advertise endpoints relative to themselves
/// (`ws://127.0.0.1:9222/...`). When `discovery_host` is not loopback,
/// the endpoint's host is replaced and its port kept.
///
/// Returns `None` when no rewrite applies or the endpoint does not parse.
#[must_use]
pub fn rewrite_remote_endpoint(endpoint: &str, discovery_host: &str) -> Option<String> {
    let discovery_host = discovery_host.trim();
    if discovery_host.is_empty() || is_loopback_host(discovery_host) {
        return None;
    }

    let mut url = Url::parse(endpoint).ok()?;
    if !url.host_str().is_some_and(is_loopback_host) {
        return None;
    }

    let new_host = if discovery_host.contains(':') && !discovery_host.starts_with('[') {
        format!("[{discovery_host}]")
    } else {
        discovery_host.to_string()
    };
    url.set_host(Some(&new_host)).ok()?;

    Some(url.into())
}

/// Returns `true` for `localhost` and loopback IP literals.
fn is_loopback_host(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    bare.eq_ignore_ascii_case("localhost")
        || bare.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

// ============================================================================
// Tests
// ============================================================================
