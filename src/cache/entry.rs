//! Per-key cache entries and their fetch state machine.
//!
//! ```text
//! absent ──get──▶ pending ──resolve──▶ success | error
//!                    ▲                        │
//!                    └──── refetch / stale ───┘
//! ```

use super::key::QueryKey;
use crate::domain::PageResult;
use crate::gateway::{GatewayError, RequestId};
use std::time::Instant;

/// Externally visible fetch status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing fetched yet, or the query is disabled.
    Idle,
    /// A request is in flight.
    Pending,
    /// The last completed request succeeded.
    Success,
    /// The last completed request failed.
    Error,
}

/// Outcome of the most recent applied response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Error,
}

/// Cached state for one query key.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: QueryKey,
    /// Last successful page. Survives errors and invalidation.
    pub data: Option<PageResult>,
    /// Last classified failure. Cleared by the next success.
    pub error: Option<GatewayError>,
    /// When the last response was applied.
    pub updated_at: Option<Instant>,
    /// Set by invalidation; forces a fetch on next access.
    pub stale: bool,
    /// Token of the request whose response may update this entry.
    pub(crate) inflight: Option<RequestId>,
    pub(crate) outcome: Option<Outcome>,
}

impl CacheEntry {
    pub(crate) const fn absent(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            error: None,
            updated_at: None,
            stale: false,
            inflight: None,
            outcome: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        if self.inflight.is_some() {
            return FetchStatus::Pending;
        }
        match self.outcome {
            None => FetchStatus::Idle,
            Some(Outcome::Success) => FetchStatus::Success,
            Some(Outcome::Error) => FetchStatus::Error,
        }
    }

    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.inflight.is_some()
    }

    /// The token a response must carry to be applied.
    #[must_use]
    pub const fn current_token(&self) -> Option<RequestId> {
        self.inflight
    }
}
