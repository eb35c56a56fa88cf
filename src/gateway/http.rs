//! Transport-neutral HTTP request and response values.
//!
//! The gateway never performs I/O. It produces [`HttpRequest`]s that the plugin
//! shim hands to Zellij's `web_request`, and consumes the [`HttpResponse`]s the
//! host delivers back. The [`RequestId`] rides along in the request context so
//! each response can be matched to the request that caused it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Context-map key carrying the request id through the host.
pub const REQUEST_ID_CONTEXT_KEY: &str = "notepane_request_id";

/// Monotonic identifier of one issued request.
///
/// Doubles as the cache's request token: a larger id was always issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parses an id back out of a request context value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok().map(Self)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing [`RequestId`]s.
#[derive(Debug, Default, Clone)]
pub struct RequestIds {
    last: u64,
}

impl RequestIds {
    /// Returns the next id. Never returns the same id twice.
    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

/// HTTP method subset the remote APIs need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// A fully built request, ready for the host to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub id: RequestId,
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    fn new(id: RequestId, method: Method, url: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        Self {
            id,
            method,
            url,
            headers,
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(id: RequestId, url: String) -> Self {
        Self::new(id, Method::Get, url)
    }

    #[must_use]
    pub fn post(id: RequestId, url: String) -> Self {
        Self::new(id, Method::Post, url)
    }

    #[must_use]
    pub fn delete(id: RequestId, url: String) -> Self {
        Self::new(id, Method::Delete, url)
    }

    /// Adds `Authorization: Bearer <token>` when a token is configured.
    #[must_use]
    pub fn bearer(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.headers
                .insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        self
    }

    /// Sets a JSON body and the matching content type.
    #[must_use]
    pub fn json(mut self, body: Vec<u8>) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = body;
        self
    }

    /// The context map to pass alongside the request.
    #[must_use]
    pub fn context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert(REQUEST_ID_CONTEXT_KEY.to_string(), self.id.get().to_string());
        context
    }
}

/// A response delivered by the host.
///
/// `status == 0` means no HTTP exchange happened (DNS failure, refused
/// connection, sandbox denial). `body` then holds the host's error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub id: RequestId,
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Builds a query string from already-ordered pairs, percent-encoding values.
pub(crate) fn query_string(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = RequestIds::default();
        let first = ids.next_id();
        let second = ids.next_id();
        assert!(second > first);
        assert_eq!(RequestId::parse(&second.get().to_string()), Some(second));
    }

    #[test]
    fn bearer_skips_missing_token() {
        let request = HttpRequest::get(RequestId::new(1), "https://x".into()).bearer(None);
        assert!(!request.headers.contains_key("Authorization"));

        let request = request.bearer(Some("abc"));
        assert_eq!(request.headers["Authorization"], "Bearer abc");
    }

    #[test]
    fn context_round_trips_request_id() {
        let request = HttpRequest::delete(RequestId::new(7), "https://x".into());
        let context = request.context();
        assert_eq!(
            context.get(REQUEST_ID_CONTEXT_KEY).and_then(|v| RequestId::parse(v)),
            Some(RequestId::new(7))
        );
    }

    #[test]
    fn query_string_encodes_values() {
        let query = query_string(&[("page", "2".into()), ("search", "fish & chips".into())]);
        assert_eq!(query, "page=2&search=fish%20%26%20chips");
    }
}
