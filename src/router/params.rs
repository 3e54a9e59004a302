//! Per-request path parameters.
//!
//! The router attaches a [`ParamSet`] to every request it dispatches through
//! the request's extensions. Handlers and middleware read it back with
//! [`get_params`], [`get_param`] and [`has_param`] instead of re-parsing the
//! path.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::server::Request;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 placeholders (e.g., /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated `(name, value)` storage.
///
/// Names are `Arc<str>` shared with the route that produced them; values are
/// per-request data cut out of the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Mapping from placeholder name to captured path segment.
///
/// Entries keep the left-to-right order of the placeholders in the route
/// pattern. Keys are unique because the pattern compiler rejects duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    entries: ParamVec,
}

impl ParamSet {
    /// An empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_vec(entries: ParamVec) -> Self {
        Self { entries }
    }

    /// Value captured for `name`, if the matched route declared it.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the matched route declared `name`, regardless of its value.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_ref() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Parameter names in placeholder order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_ref())
    }

    /// Copy into an owned map.
    /// Note: This allocates - use [`ParamSet::get`] in handlers instead
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// All parameters attached to `req`, or an empty set when the request did not
/// pass through a [`Router`](crate::router::Router).
#[must_use]
pub fn get_params(req: &Request) -> ParamSet {
    req.extensions()
        .get::<ParamSet>()
        .cloned()
        .unwrap_or_default()
}

/// The value of parameter `name`, or `""` when it is absent.
///
/// An absent parameter and a parameter captured as an empty string are not
/// distinguished here; use [`has_param`] when that matters.
#[must_use]
pub fn get_param<'a>(req: &'a Request, name: &str) -> &'a str {
    req.extensions()
        .get::<ParamSet>()
        .and_then(|params| params.get(name))
        .unwrap_or("")
}

/// Whether parameter `name` was captured for `req`.
#[must_use]
pub fn has_param(req: &Request, name: &str) -> bool {
    req.extensions()
        .get::<ParamSet>()
        .is_some_and(|params| params.contains(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn sample() -> ParamSet {
        ParamSet::from_vec(smallvec![
            (Arc::from("user_id"), "7".to_string()),
            (Arc::from("rest"), String::new()),
        ])
    }

    #[test]
    fn test_lookup_and_order() {
        let params = sample();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("user_id"), Some("7"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["user_id", "rest"]);
        assert_eq!(params.to_map().get("user_id").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_request_helpers_without_router() {
        let req = http::Request::builder()
            .uri("/users/7")
            .body(Vec::new())
            .unwrap();
        assert!(get_params(&req).is_empty());
        assert_eq!(get_param(&req, "user_id"), "");
        assert!(!has_param(&req, "user_id"));
    }

    #[test]
    fn test_request_helpers_with_attached_params() {
        let mut req = http::Request::builder()
            .uri("/users/7")
            .body(Vec::new())
            .unwrap();
        req.extensions_mut().insert(sample());

        assert_eq!(get_param(&req, "user_id"), "7");
        assert_eq!(get_params(&req), sample());

        // Present-but-empty and absent look the same through get_param.
        assert_eq!(get_param(&req, "rest"), "");
        assert_eq!(get_param(&req, "nope"), "");
        assert!(has_param(&req, "rest"));
        assert!(!has_param(&req, "nope"));
    }
}
