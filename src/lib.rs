//! Notepane: a Zellij plugin for browsing NoteHub notes and TMDB movies.
//!
//! Notepane provides:
//! - Debounced search with page reset when the settled term changes
//! - Paginated lists served from a keyed query cache with request
//!   deduplication and last-request-wins resolution
//! - Previous-page placeholders while the next page loads
//! - Note creation and deletion with cache invalidation on success
//! - Bounded, expiring notices for failures and outcomes

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The core is sans-IO. Every effect (HTTP request, timer, hiding the pane) is
//! returned as an [`Action`] and carried out by the plugin shim.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Controller    │   │ Query Cache   │   │ Mutations     │
//! │ (controller/) │   │ (cache/)      │   │ (mutation/)   │
//! │ - Debounce    │   │ - Dedupe      │   │ - Create      │
//! │ - Page reset  │   │ - Placeholder │   │ - Delete      │
//! │ - Cache key   │   │ - Invalidate  │   │ - Notices     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Remote Data Gateway (gateway/)                     │
//! │  - NoteHub and TMDB request builders                │
//! │  - Response decoding and error classification       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, UI, Observability          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`cache`]: Query cache keyed by resource, page and search term
//! - [`controller`]: Search debouncing and pagination
//! - [`domain`]: Notes, movies, pages and errors
//! - [`gateway`]: Remote API request building and response decoding
//! - [`infrastructure`]: Clocks and sandbox paths
//! - [`mutation`]: Create/delete coordination
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: OpenTelemetry tracing to a local file
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/notepane.wasm" {
//!         notehub_token "eyJhbGciOi..."
//!         tmdb_token "eyJhbGciOi..."
//!         resource "notes"
//!         per_page "12"
//!         debounce_ms "500"
//!         stale_after_secs "60"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use notepane::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//!
//! // Nothing is fetched until web access is granted.
//! let (_, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true })?;
//! assert!(matches!(actions.as_slice(), [Action::Http(_)]));
//!
//! // Typing only schedules the debounce timer.
//! handle_event(&mut state, &Event::SearchMode)?;
//! let (_, actions) = handle_event(&mut state, &Event::Char('m'))?;
//! assert!(matches!(actions.as_slice(), [Action::ScheduleTimer(_)]));
//! # Ok::<(), notepane::NotepaneError>(())
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - **Permissions**: `WebAccess`

pub mod app;
pub mod cache;
pub mod controller;
pub mod domain;
pub mod gateway;
pub mod infrastructure;
pub mod mutation;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode};
pub use domain::{NotepaneError, Result};
pub use ui::Theme;

use cache::CacheConfig;
use controller::SearchController;
use domain::ResourceKind;
use gateway::{Gateway, GatewayConfig};
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_PER_PAGE: u32 = 12;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Plugin configuration parsed from Zellij's configuration system.
///
/// Every value arrives as a string. Values that fail to parse fall back to
/// their defaults rather than aborting the plugin load.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for NoteHub. Required for any notes request to succeed.
    pub notehub_token: Option<String>,

    /// Bearer token (v4 read access token) for TMDB.
    pub tmdb_token: Option<String>,

    pub notehub_url: String,
    pub tmdb_url: String,

    /// Collection shown on startup. Default: notes.
    pub resource: ResourceKind,

    /// Items requested per notes page. TMDB pages are fixed at 20.
    pub per_page: u32,

    /// Quiet period before a search term settles. Default: 500 ms.
    pub debounce_ms: u64,

    /// Age after which a cached page is refetched on access.
    ///
    /// `None` keeps pages until a mutation invalidates them.
    pub stale_after_secs: Option<u64>,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. `~` is the host home directory.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for exported spans. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let gateway = GatewayConfig::default();
        Self {
            notehub_token: None,
            tmdb_token: None,
            notehub_url: gateway.notehub_url,
            tmdb_url: gateway.tmdb_url,
            resource: ResourceKind::Notes,
            per_page: DEFAULT_PER_PAGE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            stale_after_secs: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use notepane::domain::ResourceKind;
    /// use notepane::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("resource".to_string(), "movies".to_string());
    /// map.insert("per_page".to_string(), "zero".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.resource, ResourceKind::Movies);
    /// assert_eq!(config.per_page, 12);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |name: &str| {
            config
                .get(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let resource = text("resource")
            .and_then(|value| {
                value
                    .parse::<ResourceKind>()
                    .map_err(|e| tracing::warn!(error = %e, "ignoring resource option"))
                    .ok()
            })
            .unwrap_or(defaults.resource);

        let per_page = text("per_page")
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.per_page);

        let debounce_ms = text("debounce_ms")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(defaults.debounce_ms);

        Self {
            notehub_token: text("notehub_token"),
            tmdb_token: text("tmdb_token"),
            notehub_url: text("notehub_url").unwrap_or(defaults.notehub_url),
            tmdb_url: text("tmdb_url").unwrap_or(defaults.tmdb_url),
            resource,
            per_page,
            debounce_ms,
            stale_after_secs: text("stale_after_secs").and_then(|value| value.parse::<u64>().ok()),
            theme_name: text("theme"),
            theme_file: text("theme_file").map(|path| infrastructure::expand_tilde(&path)),
            trace_level: text("trace_level"),
        }
    }

    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            notehub_url: self.notehub_url.clone(),
            notehub_token: self.notehub_token.clone(),
            tmdb_url: self.tmdb_url.clone(),
            tmdb_token: self.tmdb_token.clone(),
            per_page: self.per_page,
        }
    }

    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            stale_after: self.stale_after_secs.map(Duration::from_secs),
            ..CacheConfig::default()
        }
    }
}

/// Builds the initial application state.
///
/// The theme comes from `theme_file`, then `theme_name`, then the default.
/// The state starts offline; the first fetch is issued once web access is
/// granted.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(resource = %config.resource, "initializing notepane plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    let controller = SearchController::new(config.resource, Duration::from_millis(config.debounce_ms));

    AppState::new(Gateway::new(&config.gateway_config()), theme)
        .with_cache_config(config.cache_config())
        .with_controller(controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        let config = Config::from_zellij(&BTreeMap::new());
        assert_eq!(config.resource, ResourceKind::Notes);
        assert_eq!(config.per_page, 12);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.stale_after_secs, None);
        assert_eq!(config.notehub_token, None);
        assert_eq!(config.notehub_url, GatewayConfig::default().notehub_url);
    }

    #[rstest]
    #[case("per_page", "0")]
    #[case("per_page", "-3")]
    #[case("debounce_ms", "soon")]
    #[case("resource", "books")]
    fn bad_values_fall_back(#[case] name: &str, #[case] value: &str) {
        let config = Config::from_zellij(&map(&[(name, value)]));
        let defaults = Config::default();
        assert_eq!(config.per_page, defaults.per_page);
        assert_eq!(config.debounce_ms, defaults.debounce_ms);
        assert_eq!(config.resource, defaults.resource);
    }

    #[test]
    fn blank_tokens_are_absent() {
        let config = Config::from_zellij(&map(&[("notehub_token", "  "), ("tmdb_token", "abc")]));
        assert_eq!(config.notehub_token, None);
        assert_eq!(config.tmdb_token.as_deref(), Some("abc"));
    }

    #[test]
    fn theme_file_is_expanded() {
        let config = Config::from_zellij(&map(&[("theme_file", "~/themes/mine.toml")]));
        assert_eq!(config.theme_file.as_deref(), Some("/host/themes/mine.toml"));
    }

    #[test]
    fn initialize_applies_resource_and_window() {
        let config = Config::from_zellij(&map(&[
            ("resource", "movies"),
            ("debounce_ms", "250"),
            ("stale_after_secs", "30"),
            ("theme", "catppuccin-latte"),
        ]));
        let state = initialize(&config);

        assert_eq!(state.resource(), ResourceKind::Movies);
        assert_eq!(state.theme.name, "catppuccin-latte");
        assert!(!state.online);
        assert_eq!(config.cache_config().stale_after, Some(Duration::from_secs(30)));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("nope".to_string()),
            ..Config::default()
        };
        assert_eq!(initialize(&config).theme, Theme::default());
    }
}
