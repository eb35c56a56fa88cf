//! Cache keys.

use crate::domain::ResourceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one (resource, page, search term) query.
///
/// Construction normalizes the search term (trimmed, inner whitespace runs
/// collapsed to one space) and clamps the page to at least 1, so keys that
/// would produce the same request compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    pub resource: ResourceKind,
    pub page: u32,
    pub search: String,
}

impl QueryKey {
    #[must_use]
    pub fn new(resource: ResourceKind, page: u32, search: impl AsRef<str>) -> Self {
        Self {
            resource,
            page: page.max(1),
            search: normalize_search(search.as_ref()),
        }
    }

    /// Whether this query should be fetched at all.
    ///
    /// Collections that require a search term are disabled while it is empty.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !(self.resource.requires_search() && self.search.is_empty())
    }

    /// The same query on another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[p{}|{:?}]", self.resource, self.page, self.search)
    }
}

/// Trims and collapses whitespace.
#[must_use]
pub fn normalize_search(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equal_queries_share_identity() {
        let mut keys = HashSet::new();
        keys.insert(QueryKey::new(ResourceKind::Notes, 1, "  team   sync "));
        keys.insert(QueryKey::new(ResourceKind::Notes, 1, "team sync"));
        keys.insert(QueryKey::new(ResourceKind::Notes, 0, "team sync"));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn resource_and_page_distinguish_keys() {
        let notes = QueryKey::new(ResourceKind::Notes, 1, "x");
        assert_ne!(notes, QueryKey::new(ResourceKind::Movies, 1, "x"));
        assert_ne!(notes, notes.with_page(2));
    }

    #[test]
    fn movie_queries_need_a_term() {
        assert!(!QueryKey::new(ResourceKind::Movies, 1, "   ").is_enabled());
        assert!(QueryKey::new(ResourceKind::Movies, 1, "dune").is_enabled());
        assert!(QueryKey::new(ResourceKind::Notes, 1, "").is_enabled());
    }
}
