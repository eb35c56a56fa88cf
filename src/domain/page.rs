//! One page of results returned by a list endpoint.

use super::item::Item;
use serde::{Deserialize, Serialize};

/// A decoded page of items plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<Item>,
    /// 1-based page number this result belongs to.
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl PageResult {
    /// An empty first page, used for disabled queries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 0,
            total_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
