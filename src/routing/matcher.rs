//! Request matching logic.
//!
//! # Responsibilities
//! - Classify request paths as REST API calls
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - The REST pattern is compiled once and shared
//! - Matchers are pure predicates; they never touch the request body

use std::sync::LazyLock;

use axum::body::Body;
use axum::http::Request;
use regex::Regex;

/// `/api/<bundle>/v<major>[.<minor>]/`, followed by anything.
static REST_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/api/[A-Za-z0-9_-]+/v\d+(\.\d+)?/").expect("REST path pattern is valid")
});

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Recognises REST API requests by their path.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestRequestMatcher;

impl RestRequestMatcher {
    pub fn is_rest_path(path: &str) -> bool {
        REST_PATH.is_match(path)
    }

    /// The matched `/api/<bundle>/v<version>/` prefix, if any.
    pub fn rest_prefix(path: &str) -> Option<&str> {
        REST_PATH.find(path).map(|m| m.as_str())
    }
}

impl Matcher for RestRequestMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        Self::is_rest_path(req.uri().path())
    }
}
