//! TMDB movie search API (read-only).
//!
//! ```text
//! GET {base}/search/movie?query=matrix&page=1
//! ```

use super::error::{decode, GatewayError};
use super::http::{query_string, HttpRequest, HttpResponse, RequestId};
use super::ResourceApi;
use crate::cache::QueryKey;
use crate::domain::{Item, Movie, PageResult, ResourceKind};
use serde::Deserialize;

/// TMDB v3 API root used when no `tmdb_url` is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB refuses `page` values above this, whatever `total_pages` claims.
pub const MAX_PAGES: u32 = 500;

#[derive(Debug, Deserialize)]
struct MoviesPage {
    results: Vec<Movie>,
    page: u32,
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

/// TMDB client configuration.
#[derive(Debug, Clone)]
pub struct TmdbApi {
    base_url: String,
    token: Option<String>,
}

impl TmdbApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

impl ResourceApi for TmdbApi {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Movies
    }

    fn page_request(&self, id: RequestId, key: &QueryKey) -> HttpRequest {
        let params = [("query", key.search.clone()), ("page", key.page.to_string())];
        let url = format!("{}/search/movie?{}", self.base_url, query_string(&params));
        HttpRequest::get(id, url).bearer(self.token.as_deref())
    }

    fn decode_page(&self, _key: &QueryKey, response: &HttpResponse) -> Result<PageResult, GatewayError> {
        let page: MoviesPage = decode(response)?;
        Ok(PageResult {
            page: page.page,
            total_pages: page.total_pages.min(MAX_PAGES),
            total_count: page.total_results,
            items: page.results.into_iter().map(Item::Movie).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemId, NewNote};
    use crate::gateway::ErrorKind;

    #[test]
    fn search_request_carries_query_and_page() {
        let api = TmdbApi::new(DEFAULT_BASE_URL, Some("tok".into()));
        let key = QueryKey::new(ResourceKind::Movies, 2, "blade runner");
        let request = api.page_request(RequestId::new(1), &key);

        assert_eq!(
            request.url,
            "https://api.themoviedb.org/3/search/movie?query=blade%20runner&page=2"
        );
        assert_eq!(request.headers["Authorization"], "Bearer tok");
    }

    #[test]
    fn clamps_total_pages() {
        let api = TmdbApi::new(DEFAULT_BASE_URL, None);
        let key = QueryKey::new(ResourceKind::Movies, 1, "a");
        let response = HttpResponse {
            id: RequestId::new(1),
            status: 200,
            body: br#"{"page":1,"results":[{"id":1,"title":"A"}],"total_pages":9000,"total_results":180000}"#.to_vec(),
        };
        let page = api.decode_page(&key, &response).unwrap();

        assert_eq!(page.total_pages, MAX_PAGES);
        assert_eq!(page.items[0].id(), &ItemId::new("1"));
    }

    #[test]
    fn mutations_are_refused() {
        let api = TmdbApi::new(DEFAULT_BASE_URL, None);
        let error = api
            .create_request(RequestId::new(1), &NewNote::default())
            .unwrap_err();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert!(api.delete_request(RequestId::new(2), &ItemId::new("1")).is_err());
    }
}
