//! Query cache.
//!
//! Stores one [`CacheEntry`] per [`QueryKey`], deduplicates concurrent
//! fetches of the same key, and applies responses only when they carry the
//! key's current request token. Mutations invalidate whole resources through
//! [`QueryCache::invalidate_resource`].
//!
//! # Example
//!
//! ```
//! use notepane::cache::{FetchStatus, QueryCache, QueryKey};
//! use notepane::domain::{PageResult, ResourceKind};
//! use notepane::gateway::RequestIds;
//! use std::time::Instant;
//!
//! let mut cache = QueryCache::default();
//! let mut ids = RequestIds::default();
//! let key = QueryKey::new(ResourceKind::Notes, 1, "");
//!
//! let ticket = cache.get(&key, &mut ids, Instant::now()).unwrap();
//! cache.resolve(ticket.id, Ok(PageResult::empty()), Instant::now());
//! assert_eq!(cache.view(&key).status, FetchStatus::Success);
//! ```

pub mod entry;
pub mod key;
pub mod store;

pub use entry::{CacheEntry, FetchStatus};
pub use key::{normalize_search, QueryKey};
pub use store::{CacheConfig, FetchTicket, QueryCache, QueryView, Resolution};
