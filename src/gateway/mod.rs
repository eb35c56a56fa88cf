//! Remote data gateway.
//!
//! A thin, I/O-free wrapper per resource: it knows how to *build* list, create
//! and delete requests and how to *interpret* their responses. Sending is the
//! plugin runtime's job (see `Action::Http`), which keeps every component
//! above this layer deterministic and testable without a network.
//!
//! # Architecture
//!
//! ```text
//!               ┌──────────────┐  HttpRequest   ┌──────────────┐
//!  QueryKey ───▶│   Gateway    │───────────────▶│ Zellij host  │
//!               │ ResourceApi  │◀───────────────│ web_request  │
//!  PageResult ◀─│ (per kind)   │  HttpResponse  └──────────────┘
//!  GatewayError └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`http`]: request/response values and request ids
//! - [`error`]: failure classification
//! - [`notehub`]: NoteHub notes API
//! - [`tmdb`]: TMDB movie search API

pub mod error;
pub mod http;
pub mod notehub;
pub mod tmdb;

pub use error::{ErrorKind, FieldError, GatewayError};
pub use http::{HttpRequest, HttpResponse, Method, RequestId, RequestIds};
pub use notehub::NoteHubApi;
pub use tmdb::TmdbApi;

use crate::cache::QueryKey;
use crate::domain::{Item, ItemId, NewNote, PageResult, ResourceKind};
use std::fmt::Debug;

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub id: ItemId,
    pub message: String,
}

/// Request building and response decoding for one remote collection.
///
/// Mutation methods default to refusing with a validation error, which is
/// what read-only collections want.
pub trait ResourceApi: Debug + Send + Sync {
    /// The collection this API serves.
    fn kind(&self) -> ResourceKind;

    /// Builds the list/search request for `key`.
    fn page_request(&self, id: RequestId, key: &QueryKey) -> HttpRequest;

    /// Decodes a list/search response.
    ///
    /// # Errors
    ///
    /// Returns the classified failure for non-2xx or malformed responses.
    fn decode_page(&self, key: &QueryKey, response: &HttpResponse) -> Result<PageResult, GatewayError>;

    /// Builds a create request.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the collection is read-only.
    fn create_request(&self, _id: RequestId, _note: &NewNote) -> Result<HttpRequest, GatewayError> {
        Err(GatewayError::read_only(self.kind().title()))
    }

    /// Decodes a create response into the created item.
    ///
    /// # Errors
    ///
    /// Returns the classified failure for non-2xx or malformed responses.
    fn decode_created(&self, _response: &HttpResponse) -> Result<Item, GatewayError> {
        Err(GatewayError::read_only(self.kind().title()))
    }

    /// Builds a delete request for `item`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the collection is read-only.
    fn delete_request(&self, _id: RequestId, _item: &ItemId) -> Result<HttpRequest, GatewayError> {
        Err(GatewayError::read_only(self.kind().title()))
    }

    /// Decodes a delete response.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; a missing item surfaces as
    /// [`ErrorKind::NotFound`].
    fn decode_deleted(&self, _item: &ItemId, _response: &HttpResponse) -> Result<Confirmation, GatewayError> {
        Err(GatewayError::read_only(self.kind().title()))
    }
}

/// Endpoint settings for both collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub notehub_url: String,
    pub notehub_token: Option<String>,
    pub tmdb_url: String,
    pub tmdb_token: Option<String>,
    pub per_page: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            notehub_url: notehub::DEFAULT_BASE_URL.to_string(),
            notehub_token: None,
            tmdb_url: tmdb::DEFAULT_BASE_URL.to_string(),
            tmdb_token: None,
            per_page: 12,
        }
    }
}

/// Routes each call to the API serving the requested collection.
#[derive(Debug)]
pub struct Gateway {
    notes: Box<dyn ResourceApi>,
    movies: Box<dyn ResourceApi>,
}

impl Gateway {
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            notes: Box::new(NoteHubApi::new(
                config.notehub_url.clone(),
                config.notehub_token.clone(),
                config.per_page,
            )),
            movies: Box::new(TmdbApi::new(config.tmdb_url.clone(), config.tmdb_token.clone())),
        }
    }

    /// Builds a gateway from custom API implementations.
    #[must_use]
    pub fn with_apis(notes: Box<dyn ResourceApi>, movies: Box<dyn ResourceApi>) -> Self {
        Self { notes, movies }
    }

    #[must_use]
    pub fn api(&self, kind: ResourceKind) -> &dyn ResourceApi {
        match kind {
            ResourceKind::Notes => self.notes.as_ref(),
            ResourceKind::Movies => self.movies.as_ref(),
        }
    }

    #[must_use]
    pub fn page_request(&self, id: RequestId, key: &QueryKey) -> HttpRequest {
        self.api(key.resource).page_request(id, key)
    }

    /// # Errors
    ///
    /// See [`ResourceApi::decode_page`].
    pub fn decode_page(&self, key: &QueryKey, response: &HttpResponse) -> Result<PageResult, GatewayError> {
        self.api(key.resource).decode_page(key, response)
    }

    /// # Errors
    ///
    /// See [`ResourceApi::create_request`].
    pub fn create_request(
        &self,
        kind: ResourceKind,
        id: RequestId,
        note: &NewNote,
    ) -> Result<HttpRequest, GatewayError> {
        self.api(kind).create_request(id, note)
    }

    /// # Errors
    ///
    /// See [`ResourceApi::decode_created`].
    pub fn decode_created(&self, kind: ResourceKind, response: &HttpResponse) -> Result<Item, GatewayError> {
        self.api(kind).decode_created(response)
    }

    /// # Errors
    ///
    /// See [`ResourceApi::delete_request`].
    pub fn delete_request(
        &self,
        kind: ResourceKind,
        id: RequestId,
        item: &ItemId,
    ) -> Result<HttpRequest, GatewayError> {
        self.api(kind).delete_request(id, item)
    }

    /// # Errors
    ///
    /// See [`ResourceApi::decode_deleted`].
    pub fn decode_deleted(
        &self,
        kind: ResourceKind,
        item: &ItemId,
        response: &HttpResponse,
    ) -> Result<Confirmation, GatewayError> {
        self.api(kind).decode_deleted(item, response)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(&GatewayConfig::default())
    }
}
