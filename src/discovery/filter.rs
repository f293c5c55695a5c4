//! Target filtering and deduplication.
//!
//! Filtering is pure and order-preserving: the output is always a
//! subsequence of the input in its original discovery order.

// ============================================================================
// Imports
// ============================================================================

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::protocol::{DiscoveryTarget, PAGE_TARGET_TYPE};

// ============================================================================
// TargetFilter
// ============================================================================

/// Inclusion predicate over target types.
///
/// The default accepts user-facing pages and targets that report no type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFilter {
    /// Accepted types; `None` accepts every type.
    types: Option<Vec<String>>,
    /// Whether targets with an empty type are accepted.
    include_untyped: bool,
}

impl Default for TargetFilter {
    fn default() -> Self {
        Self::pages()
    }
}

impl TargetFilter {
    /// Accepts `page` targets and untyped targets.
    #[inline]
    #[must_use]
    pub fn pages() -> Self {
        Self {
            types: Some(vec![PAGE_TARGET_TYPE.to_string()]),
            include_untyped: true,
        }
    }

    /// Accepts every target.
    #[inline]
    #[must_use]
    pub const fn any() -> Self {
        Self {
            types: None,
            include_untyped: true,
        }
    }

    /// Accepts only the listed types.
    #[must_use]
    pub fn with_types(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            types: Some(types.into_iter().map(Into::into).collect()),
            include_untyped: false,
        }
    }

    /// Sets whether targets that report no type are accepted.
    #[inline]
    #[must_use]
    pub fn include_untyped(mut self, include: bool) -> Self {
        self.include_untyped = include;
        self
    }

    /// Returns `true` if `target` passes the filter.
    #[must_use]
    pub fn matches(&self, target: &DiscoveryTarget) -> bool {
        if target.is_untyped() {
            return self.include_untyped;
        }

        match &self.types {
            Some(types) => types.iter().any(|t| *t == target.target_type),
            None => true,
        }
    }
}

// ============================================================================
// UrlPattern
// ============================================================================

/// Caller-supplied URL restriction.
///
/// Case-insensitive, trailing `/` ignored on both sides. Without `*` the
/// pattern is a prefix; with `*` it must match the whole URL, each `*`
/// standing for any run of characters.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    /// Pattern as supplied.
    raw: String,
    /// Compiled matcher.
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Prefix(String),
    Wildcard(Regex),
}

impl UrlPattern {
    /// Compiles a URL pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the wildcard pattern cannot be
    /// compiled.
    pub fn new(pattern: &str) -> Result<Self> {
        let standardized = standardize(pattern);

        let matcher = if standardized.contains('*') {
            let body = standardized
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            let regex = Regex::new(&format!("^{body}$")).map_err(|e| {
                Error::invalid_argument(format!("invalid url filter {pattern:?}: {e}"))
            })?;
            Matcher::Wildcard(regex)
        } else {
            Matcher::Prefix(standardized)
        };

        Ok(Self {
            raw: pattern.to_string(),
            matcher,
        })
    }

    /// Returns the pattern as supplied.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if `url` matches.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let url = standardize(url);
        match &self.matcher {
            Matcher::Prefix(prefix) => url.starts_with(prefix.as_str()),
            Matcher::Wildcard(regex) => regex.is_match(&url),
        }
    }
}

/// Lowercases and strips trailing slashes.
fn standardize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

// ============================================================================
// Filtering
// ============================================================================

/// Keeps the targets accepted by `predicate`, in their original order.
#[must_use]
pub fn filter_targets<F>(targets: Vec<DiscoveryTarget>, predicate: F) -> Vec<DiscoveryTarget>
where
    F: Fn(&DiscoveryTarget) -> bool,
{
    targets.into_iter().filter(|t| predicate(t)).collect()
}

/// Drops targets whose attach endpoint was already seen, keeping the first.
#[must_use]
pub fn dedup_by_endpoint(targets: Vec<DiscoveryTarget>) -> Vec<DiscoveryTarget> {
    let mut seen = FxHashSet::default();
    targets
        .into_iter()
        .filter(|t| seen.insert(t.web_socket_debugger_url.clone()))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::identifiers::TargetId;

    fn target(id: &str, target_type: &str, url: &str) -> DiscoveryTarget {
        DiscoveryTarget {
            id: TargetId::new(id),
            title: id.to_string(),
            unescaped_title: id.to_string(),
            url: url.to_string(),
            web_socket_debugger_url: format!("ws://127.0.0.1:9222/devtools/page/{id}"),
            target_type: target_type.to_string(),
            devtools_frontend_url: None,
            favicon_url: None,
            description: None,
        }
    }

    #[test]
    fn test_pages_filter() {
        let filter = TargetFilter::default();
        assert!(filter.matches(&target("1", "page", "http://a/")));
        assert!(filter.matches(&target("2", "", "http://a/")));
        assert!(!filter.matches(&target("3", "service_worker", "http://a/")));
        assert!(!filter.matches(&target("4", "background_page", "http://a/")));
    }

    #[test]
    fn test_any_filter() {
        let filter = TargetFilter::any();
        assert!(filter.matches(&target("1", "iframe", "http://a/")));
        assert!(filter.matches(&target("2", "", "http://a/")));
    }

    #[test]
    fn test_with_types_excludes_untyped_by_default() {
        let filter = TargetFilter::with_types(["page", "webview"]);
        assert!(filter.matches(&target("1", "webview", "http://a/")));
        assert!(!filter.matches(&target("2", "", "http://a/")));

        let filter = filter.include_untyped(true);
        assert!(filter.matches(&target("2", "", "http://a/")));
    }

    #[test]
    fn test_url_pattern_prefix() {
        let pattern = UrlPattern::new("http://localhost:8080").expect("valid");
        assert!(pattern.matches("http://localhost:8080/"));
        assert!(pattern.matches("http://LOCALHOST:8080/app/index.html"));
        assert!(!pattern.matches("http://localhost:3000/"));
        assert_eq!(pattern.as_str(), "http://localhost:8080");
    }

    #[test]
    fn test_url_pattern_trailing_slash() {
        let pattern = UrlPattern::new("http://localhost:8080/").expect("valid");
        assert!(pattern.matches("http://localhost:8080"));
    }

    #[test]
    fn test_url_pattern_wildcard() {
        let pattern = UrlPattern::new("http://localhost:*/app/*").expect("valid");
        assert!(pattern.matches("http://localhost:8080/app/index.html"));
        assert!(pattern.matches("http://localhost:3000/app/main.js"));
        assert!(!pattern.matches("http://localhost:3000/app/"));
        assert!(!pattern.matches("http://example.com:80/app/x"));
    }

    #[test]
    fn test_url_pattern_escapes_regex_chars() {
        let pattern = UrlPattern::new("http://a.com/?q=(1)*").expect("valid");
        assert!(pattern.matches("http://a.com/?q=(1)&x=2"));
        assert!(!pattern.matches("http://abcom/?q=(1)"));
    }

    #[test]
    fn test_filter_targets_preserves_order() {
        let targets = vec![
            target("1", "page", "http://a/"),
            target("2", "service_worker", "http://a/"),
            target("3", "page", "http://b/"),
        ];

        let filter = TargetFilter::pages();
        let kept: Vec<_> = filter_targets(targets, |t| filter.matches(t))
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(kept, ["1", "3"]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut second = target("2", "page", "http://b/");
        second.web_socket_debugger_url = target("1", "page", "").web_socket_debugger_url;

        let targets = vec![target("1", "page", "http://a/"), second, target("3", "page", "")];
        let ids: Vec<_> = dedup_by_endpoint(targets)
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    proptest! {
        #[test]
        fn prop_filter_is_ordered_subsequence(
            kinds in prop::collection::vec(
                prop_oneof![Just("page"), Just("iframe"), Just("worker"), Just("")],
                0..48,
            )
        ) {
            let targets: Vec<_> = kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| target(&i.to_string(), kind, "http://a/"))
                .collect();

            let filter = TargetFilter::pages();
            let kept = filter_targets(targets.clone(), |t| filter.matches(t));

            let mut cursor = targets.iter();
            for t in &kept {
                prop_assert!(cursor.any(|orig| orig == t));
            }
            prop_assert_eq!(
                kept.len(),
                kinds.iter().filter(|k| **k == "page" || k.is_empty()).count()
            );
        }
    }
}
