//! NoteHub notes API.
//!
//! ```text
//! GET    {base}/notes?page=1&perPage=12&search=milk
//! POST   {base}/notes            {"title","body","tag"}
//! DELETE {base}/notes/{id}
//! ```

use super::error::{decode, GatewayError};
use super::http::{query_string, HttpRequest, HttpResponse, RequestId};
use super::{Confirmation, ResourceApi};
use crate::cache::QueryKey;
use crate::domain::{Item, ItemId, NewNote, Note, PageResult, ResourceKind};
use serde::Deserialize;

/// Public NoteHub instance used when no `notehub_url` is configured.
pub const DEFAULT_BASE_URL: &str = "https://notehub-public.goit.study/api";

/// List endpoint body.
///
/// Older deployments answer with `results`/`totalResults`, newer ones with
/// `notes` and no total count; both are accepted.
#[derive(Debug, Deserialize)]
struct NotesPage {
    #[serde(alias = "results")]
    notes: Vec<Note>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(rename = "totalPages", default)]
    total_pages: u32,
    #[serde(rename = "totalResults", alias = "totalCount", default)]
    total_count: Option<u64>,
}

/// Delete endpoint body: either a receipt or the deleted note itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeletedNote {
    Receipt {
        message: String,
        #[serde(rename = "deletedNoteId")]
        deleted_note_id: ItemId,
    },
    Note(Note),
}

/// NoteHub client configuration.
#[derive(Debug, Clone)]
pub struct NoteHubApi {
    base_url: String,
    token: Option<String>,
    per_page: u32,
}

impl NoteHubApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>, per_page: u32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            per_page: per_page.max(1),
        }
    }
}

impl ResourceApi for NoteHubApi {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Notes
    }

    fn page_request(&self, id: RequestId, key: &QueryKey) -> HttpRequest {
        let mut params = vec![
            ("page", key.page.to_string()),
            ("perPage", self.per_page.to_string()),
        ];
        if !key.search.is_empty() {
            params.push(("search", key.search.clone()));
        }
        let url = format!("{}/notes?{}", self.base_url, query_string(&params));
        HttpRequest::get(id, url).bearer(self.token.as_deref())
    }

    fn decode_page(&self, key: &QueryKey, response: &HttpResponse) -> Result<PageResult, GatewayError> {
        let page: NotesPage = decode(response)?;
        let total_count = page.total_count.unwrap_or(page.notes.len() as u64);
        Ok(PageResult {
            page: page.page.unwrap_or(key.page),
            total_pages: page.total_pages,
            total_count,
            items: page.notes.into_iter().map(Item::Note).collect(),
        })
    }

    fn create_request(&self, id: RequestId, note: &NewNote) -> Result<HttpRequest, GatewayError> {
        let body = serde_json::to_vec(note).map_err(|e| {
            GatewayError::new(super::ErrorKind::Validation, format!("cannot encode note: {e}"))
        })?;
        let url = format!("{}/notes", self.base_url);
        Ok(HttpRequest::post(id, url)
            .bearer(self.token.as_deref())
            .json(body))
    }

    fn decode_created(&self, response: &HttpResponse) -> Result<Item, GatewayError> {
        decode::<Note>(response).map(Item::Note)
    }

    fn delete_request(&self, id: RequestId, item: &ItemId) -> Result<HttpRequest, GatewayError> {
        let url = format!(
            "{}/notes/{}",
            self.base_url,
            urlencoding::encode(item.as_str())
        );
        Ok(HttpRequest::delete(id, url).bearer(self.token.as_deref()))
    }

    fn decode_deleted(&self, item: &ItemId, response: &HttpResponse) -> Result<Confirmation, GatewayError> {
        let confirmation = match decode::<DeletedNote>(response)? {
            DeletedNote::Receipt {
                message,
                deleted_note_id,
            } => Confirmation {
                id: deleted_note_id,
                message,
            },
            DeletedNote::Note(note) => Confirmation {
                message: format!("Deleted \"{}\"", note.title),
                id: note.id,
            },
        };
        if &confirmation.id != item {
            tracing::debug!(requested = %item, confirmed = %confirmation.id, "delete confirmed a different id");
        }
        Ok(confirmation)
    }
}
