//! The keyed query store.
//!
//! `QueryCache` decides *whether* a fetch is needed and *which* response may
//! land; it never fetches by itself. Callers turn the returned
//! [`FetchTicket`]s into requests and feed responses back through
//! [`QueryCache::resolve`].
//!
//! Ordering relies on request tokens rather than key equality: each entry
//! remembers the token of the one request allowed to update it. Invalidation
//! forgets that token, so a response to a superseded request is dropped even
//! though it is for the very same key.

use super::entry::{CacheEntry, FetchStatus, Outcome};
use super::key::QueryKey;
use crate::domain::{PageResult, ResourceKind};
use crate::gateway::{GatewayError, RequestId, RequestIds};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default number of entries kept before evicting the oldest.
pub const DEFAULT_CAPACITY: usize = 64;

/// Cache tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age after which a successful entry is refetched on access. `None`
    /// keeps entries fresh until they are invalidated.
    pub stale_after: Option<Duration>,
    /// Soft cap on stored entries.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after: None,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// A fetch the caller must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    pub id: RequestId,
}

/// What happened to a response handed to [`QueryCache::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The response updated the entry for `key`.
    Applied {
        key: QueryKey,
        /// True when the entry moved into a *new* error (first failure, or a
        /// failure different from the one already recorded).
        notify_error: bool,
    },
    /// The request was superseded or unknown; nothing changed.
    Discarded,
}

/// Read-only snapshot of a query for rendering.
#[derive(Debug, Clone, Copy)]
pub struct QueryView<'a> {
    pub status: FetchStatus,
    /// The key's own data, or a placeholder from the previously shown key of
    /// the same resource while this one is pending.
    pub data: Option<&'a PageResult>,
    pub error: Option<&'a GatewayError>,
    pub is_placeholder: bool,
    pub is_stale: bool,
}

impl QueryView<'_> {
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        matches!(self.status, FetchStatus::Pending)
    }

    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.data.map(|page| page.total_pages)
    }
}

/// Keyed store of in-flight and completed page fetches.
#[derive(Debug, Default)]
pub struct QueryCache {
    config: CacheConfig,
    entries: HashMap<QueryKey, CacheEntry>,
    active: Option<QueryKey>,
    /// Per resource, the last key whose data was on screen.
    shown: HashMap<ResourceKind, QueryKey>,
}

impl QueryCache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Makes `key` the active query and returns a ticket if it must be fetched.
    ///
    /// Returns `None` for a fresh cache hit, for a disabled query, or when a
    /// request for `key` is already in flight (callers share that request).
    pub fn get(&mut self, key: &QueryKey, ids: &mut RequestIds, now: Instant) -> Option<FetchTicket> {
        let _span = tracing::debug_span!("cache_get", key = %key).entered();
        self.active = Some(key.clone());

        if !key.is_enabled() {
            tracing::debug!("query disabled");
            return None;
        }

        let stale_after = self.config.stale_after;
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::absent(key.clone()));

        if let Some(token) = entry.inflight {
            tracing::debug!(token = %token, "joining in-flight request");
            return None;
        }

        let expired = stale_after.is_some_and(|ttl| {
            entry
                .updated_at
                .map_or(true, |at| now.saturating_duration_since(at) >= ttl)
        });
        let needs_fetch = entry.data.is_none()
            || entry.stale
            || expired
            || entry.outcome == Some(Outcome::Error);

        if entry.data.is_some() {
            self.shown.insert(key.resource, key.clone());
        }

        if !needs_fetch {
            tracing::debug!("cache hit");
            return None;
        }

        let ticket = Self::issue(entry, ids);
        self.evict_over_capacity();
        Some(ticket)
    }

    /// Issues a fetch for `key` even when its data is fresh.
    ///
    /// Still deduplicates: returns `None` if a request is already in flight.
    pub fn refetch(&mut self, key: &QueryKey, ids: &mut RequestIds) -> Option<FetchTicket> {
        if !key.is_enabled() {
            return None;
        }
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::absent(key.clone()));
        if entry.inflight.is_some() {
            return None;
        }
        Some(Self::issue(entry, ids))
    }

    fn issue(entry: &mut CacheEntry, ids: &mut RequestIds) -> FetchTicket {
        let id = ids.next_id();
        entry.inflight = Some(id);
        tracing::debug!(key = %entry.key, token = %id, "fetch issued");
        FetchTicket {
            key: entry.key.clone(),
            id,
        }
    }

    /// Applies a response if `id` is still the current token for its key.
    pub fn resolve(
        &mut self,
        id: RequestId,
        result: Result<PageResult, GatewayError>,
        now: Instant,
    ) -> Resolution {
        let Some(entry) = self.entries.values_mut().find(|e| e.inflight == Some(id)) else {
            tracing::debug!(token = %id, "discarding superseded response");
            return Resolution::Discarded;
        };

        entry.inflight = None;
        entry.updated_at = Some(now);
        let key = entry.key.clone();

        let notify_error = match result {
            Ok(page) => {
                tracing::debug!(key = %key, items = page.items.len(), total_pages = page.total_pages, "fetch succeeded");
                entry.data = Some(page);
                entry.error = None;
                entry.stale = false;
                entry.outcome = Some(Outcome::Success);
                if self.active.as_ref() == Some(&key) {
                    self.shown.insert(key.resource, key.clone());
                }
                false
            }
            Err(error) => {
                let is_new = entry
                    .error
                    .as_ref()
                    .map_or(true, |previous| previous.kind != error.kind || previous.message != error.message);
                tracing::debug!(key = %key, error = %error, is_new, "fetch failed");
                entry.error = Some(error);
                entry.outcome = Some(Outcome::Error);
                is_new
            }
        };

        Resolution::Applied { key, notify_error }
    }

    /// Marks matching entries stale and drops their in-flight tokens.
    ///
    /// Returns how many entries matched.
    pub fn invalidate(&mut self, mut predicate: impl FnMut(&QueryKey) -> bool) -> usize {
        let mut count = 0;
        for entry in self.entries.values_mut().filter(|e| predicate(&e.key)) {
            entry.stale = true;
            entry.inflight = None;
            count += 1;
        }
        tracing::debug!(count, "entries invalidated");
        count
    }

    /// Invalidates every entry of one resource, whatever its page or search.
    pub fn invalidate_resource(&mut self, resource: ResourceKind) -> usize {
        self.invalidate(|key| key.resource == resource)
    }

    /// Evicts matching entries entirely.
    pub fn remove(&mut self, mut predicate: impl FnMut(&QueryKey) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        let entries = &self.entries;
        self.shown.retain(|_, key| entries.contains_key(key));
        before - self.entries.len()
    }

    /// Snapshot for rendering `key`.
    #[must_use]
    pub fn view(&self, key: &QueryKey) -> QueryView<'_> {
        let entry = self.entries.get(key);
        let status = entry.map_or(FetchStatus::Idle, CacheEntry::status);
        let own = entry.and_then(|e| e.data.as_ref());

        let placeholder = if own.is_none() && status == FetchStatus::Pending {
            self.shown
                .get(&key.resource)
                .filter(|shown| *shown != key)
                .and_then(|shown| self.entries.get(shown))
                .and_then(|e| e.data.as_ref())
        } else {
            None
        };

        QueryView {
            status,
            data: own.or(placeholder),
            error: entry.and_then(|e| e.error.as_ref()),
            is_placeholder: placeholder.is_some(),
            is_stale: entry.is_some_and(|e| e.stale),
        }
    }

    #[must_use]
    pub fn entry(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    #[must_use]
    pub const fn active_key(&self) -> Option<&QueryKey> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the oldest settled entries that nothing is looking at.
    fn evict_over_capacity(&mut self) {
        while self.entries.len() > self.config.capacity.max(1) {
            let victim = self
                .entries
                .values()
                .filter(|e| {
                    e.inflight.is_none()
                        && Some(&e.key) != self.active.as_ref()
                        && self.shown.get(&e.key.resource) != Some(&e.key)
                })
                .min_by_key(|e| e.updated_at)
                .map(|e| e.key.clone());

            let Some(victim) = victim else { break };
            tracing::debug!(key = %victim, "evicting cache entry");
            self.entries.remove(&victim);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, ItemId, Note};
    use crate::gateway::ErrorKind;

    fn notes(page: u32, search: &str) -> QueryKey {
        QueryKey::new(ResourceKind::Notes, page, search)
    }

    fn page_of(page: u32, titles: &[&str], total_pages: u32) -> PageResult {
        PageResult {
            items: titles
                .iter()
                .map(|t| {
                    Item::Note(Note {
                        id: ItemId::new(*t),
                        title: (*t).to_string(),
                        body: String::new(),
                        tag: None,
                        created_at: None,
                        updated_at: None,
                    })
                })
                .collect(),
            page,
            total_pages,
            total_count: titles.len() as u64,
        }
    }

    fn network_error() -> GatewayError {
        GatewayError::new(ErrorKind::Network, "offline")
    }

    #[test]
    fn first_get_fetches_and_second_joins() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();
        let key = notes(1, "");

        let ticket = cache.get(&key, &mut ids, now).expect("first access fetches");
        assert_eq!(ticket.key, key);
        assert_eq!(cache.view(&key).status, FetchStatus::Pending);

        assert_eq!(cache.get(&key, &mut ids, now), None, "deduplicated");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn repeat_access_is_a_cache_hit() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();
        let page_two = notes(2, "");

        let ticket = cache.get(&page_two, &mut ids, now).unwrap();
        cache.resolve(ticket.id, Ok(page_of(2, &["a"], 5)), now);

        let _ = cache.get(&notes(3, ""), &mut ids, now);
        assert_eq!(cache.get(&page_two, &mut ids, now), None);
        assert_eq!(cache.view(&page_two).status, FetchStatus::Success);
    }

    #[test]
    fn later_request_wins_even_if_earlier_resolves_last() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();
        let key = notes(1, "");

        let first = cache.get(&key, &mut ids, now).unwrap();
        cache.invalidate_resource(ResourceKind::Notes);
        let second = cache.get(&key, &mut ids, now).unwrap();
        assert!(second.id > first.id);

        let applied = cache.resolve(second.id, Ok(page_of(1, &["new"], 1)), now);
        assert!(matches!(applied, Resolution::Applied { .. }));

        let late = cache.resolve(first.id, Ok(page_of(1, &["old"], 1)), now);
        assert_eq!(late, Resolution::Discarded);
        assert_eq!(cache.view(&key).data.unwrap().items[0].title(), "new");
    }

    #[test]
    fn pending_key_shows_previous_page_as_placeholder() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();

        let first = cache.get(&notes(1, ""), &mut ids, now).unwrap();
        cache.resolve(first.id, Ok(page_of(1, &["a", "b"], 3)), now);

        let second = notes(2, "");
        let _ticket = cache.get(&second, &mut ids, now).unwrap();
        let view = cache.view(&second);

        assert_eq!(view.status, FetchStatus::Pending);
        assert!(view.is_placeholder);
        assert_eq!(view.data.unwrap().items.len(), 2);
    }

    #[test]
    fn placeholder_does_not_cross_resources() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();

        let first = cache.get(&notes(1, ""), &mut ids, now).unwrap();
        cache.resolve(first.id, Ok(page_of(1, &["a"], 1)), now);

        let movies = QueryKey::new(ResourceKind::Movies, 1, "alien");
        let _ticket = cache.get(&movies, &mut ids, now).unwrap();
        assert!(cache.view(&movies).data.is_none());
    }

    #[test]
    fn failure_keeps_last_good_data() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();
        let key = notes(1, "");

        let ticket = cache.get(&key, &mut ids, now).unwrap();
        cache.resolve(ticket.id, Ok(page_of(1, &["kept"], 1)), now);

        let ticket = cache.refetch(&key, &mut ids).unwrap();
        let resolution = cache.resolve(ticket.id, Err(network_error()), now);
        assert_eq!(resolution, Resolution::Applied { key: key.clone(), notify_error: true });

        let view = cache.view(&key);
        assert_eq!(view.status, FetchStatus::Error);
        assert_eq!(view.data.unwrap().items[0].title(), "kept");
        assert_eq!(view.error.unwrap().kind, ErrorKind::Network);
    }

    #[test]
    fn identical_repeated_failures_notify_once() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();
        let key = notes(1, "");

        let ticket = cache.get(&key, &mut ids, now).unwrap();
        let first = cache.resolve(ticket.id, Err(network_error()), now);
        let ticket = cache.get(&key, &mut ids, now).expect("errored entries refetch");
        let second = cache.resolve(ticket.id, Err(network_error()), now);

        assert_eq!(first, Resolution::Applied { key: key.clone(), notify_error: true });
        assert_eq!(second, Resolution::Applied { key, notify_error: false });
    }

    #[test]
    fn invalidation_forces_fetch_for_every_page_and_term() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();

        for key in [notes(1, ""), notes(2, ""), notes(1, "milk")] {
            let ticket = cache.get(&key, &mut ids, now).unwrap();
            cache.resolve(ticket.id, Ok(page_of(key.page, &["x"], 2)), now);
        }
        let movies = QueryKey::new(ResourceKind::Movies, 1, "up");
        let ticket = cache.get(&movies, &mut ids, now).unwrap();
        cache.resolve(ticket.id, Ok(page_of(1, &["m"], 1)), now);

        assert_eq!(cache.invalidate_resource(ResourceKind::Notes), 3);

        assert!(cache.get(&notes(1, ""), &mut ids, now).is_some());
        assert!(cache.get(&notes(1, "milk"), &mut ids, now).is_some());
        assert!(cache.get(&movies, &mut ids, now).is_none());
    }

    #[test]
    fn stale_after_expires_entries() {
        let mut cache = QueryCache::new(CacheConfig {
            stale_after: Some(Duration::from_secs(30)),
            ..CacheConfig::default()
        });
        let mut ids = RequestIds::default();
        let start = Instant::now();
        let key = notes(1, "");

        let ticket = cache.get(&key, &mut ids, start).unwrap();
        cache.resolve(ticket.id, Ok(page_of(1, &["a"], 1)), start);

        assert!(cache.get(&key, &mut ids, start + Duration::from_secs(10)).is_none());
        assert!(cache.get(&key, &mut ids, start + Duration::from_secs(31)).is_some());
    }

    #[test]
    fn disabled_queries_never_fetch() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let key = QueryKey::new(ResourceKind::Movies, 1, "");

        assert!(cache.get(&key, &mut ids, Instant::now()).is_none());
        assert_eq!(cache.view(&key).status, FetchStatus::Idle);
    }

    #[test]
    fn capacity_evicts_oldest_inactive_entry() {
        let mut cache = QueryCache::new(CacheConfig {
            capacity: 2,
            ..CacheConfig::default()
        });
        let mut ids = RequestIds::default();
        let start = Instant::now();

        for (offset, page) in [1_u32, 2, 3].into_iter().enumerate() {
            let at = start + Duration::from_secs(offset as u64);
            let key = notes(page, "");
            let ticket = cache.get(&key, &mut ids, at).unwrap();
            cache.resolve(ticket.id, Ok(page_of(page, &["x"], 3)), at);
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.entry(&notes(1, "")).is_none());
    }

    #[test]
    fn remove_evicts_entries() {
        let mut cache = QueryCache::default();
        let mut ids = RequestIds::default();
        let now = Instant::now();
        let key = notes(1, "");
        let ticket = cache.get(&key, &mut ids, now).unwrap();
        cache.resolve(ticket.id, Err(network_error()), now);

        assert_eq!(cache.remove(|k| k.resource == ResourceKind::Notes), 1);
        assert_eq!(cache.view(&key).status, FetchStatus::Idle);
        assert!(cache.view(&key).error.is_none());
    }
}
