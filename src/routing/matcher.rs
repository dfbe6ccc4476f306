//! Interception scope matching.
//!
//! # Responsibilities
//! - Decide whether the tenant router runs for a request at all
//! - Match path prefixes (case-sensitive)
//! - Combine exclusions with NOR semantics
//!
//! # Design Decisions
//! - Empty exclusion list = every request is intercepted
//! - No regex to guarantee O(n) matching

use axum::http::Uri;

/// Trait for matching request URIs against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the URI matches this condition.
    fn matches(&self, uri: &Uri) -> bool;
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, uri: &Uri) -> bool {
        uri.path().starts_with(&self.prefix)
    }
}

/// Paths the tenant router is invoked for: everything not matched by one of
/// the exclusions.
#[derive(Debug, Default)]
pub struct InterceptScope {
    exclusions: Vec<Box<dyn Matcher>>,
}

impl InterceptScope {
    pub fn new(exclusions: Vec<Box<dyn Matcher>>) -> Self {
        Self { exclusions }
    }

    /// Build a scope excluding each of the given path prefixes.
    pub fn excluding_prefixes<S: AsRef<str>>(prefixes: &[S]) -> Self {
        Self::new(
            prefixes
                .iter()
                .map(|p| Box::new(PathPrefixMatcher::new(p.as_ref())) as Box<dyn Matcher>)
                .collect(),
        )
    }
}

impl Matcher for InterceptScope {
    fn matches(&self, uri: &Uri) -> bool {
        !self.exclusions.iter().any(|m| m.matches(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TenancyConfig;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/_next/static");
        assert!(matcher.matches(&uri("http://example.com/_next/static/chunks/app.js")));
        assert!(!matcher.matches(&uri("http://example.com/_next/data")));
    }

    #[test]
    fn test_default_scope() {
        let scope = InterceptScope::excluding_prefixes(&TenancyConfig::default().intercept_exclusions);

        assert!(!scope.matches(&uri("/_next/static/css/app.css")));
        assert!(!scope.matches(&uri("/_next/image?url=%2Flogo.png&w=64")));
        assert!(!scope.matches(&uri("/favicon.ico")));
        assert!(!scope.matches(&uri("/public/logo.svg")));

        assert!(scope.matches(&uri("/")));
        assert!(scope.matches(&uri("/acme-co/dashboard")));
        assert!(scope.matches(&uri("/publications")));
        assert!(scope.matches(&uri("/_next/data/x.json")));
    }

    #[test]
    fn test_empty_scope_intercepts_everything() {
        let scope = InterceptScope::default();
        assert!(scope.matches(&uri("/favicon.ico")));
    }
}
