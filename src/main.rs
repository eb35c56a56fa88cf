//! Zellij plugin shim.
//!
//! Translates Zellij events into [`Event`]s, feeds them to [`handle_event`]
//! and carries out the returned [`Action`]s through host calls. No state lives
//! here beyond the [`AppState`](notepane::AppState) itself.
//!
//! # Lifecycle
//!
//! 1. `load`: parse configuration, start tracing, request `WebAccess`,
//!    subscribe to key, timer, web-request and permission events.
//! 2. `update`: map the host event, run the handler, execute actions.
//! 3. `render`: draw the current state.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;

use notepane::gateway::http::REQUEST_ID_CONTEXT_KEY;
use notepane::gateway::{HttpResponse, Method, RequestId};
use notepane::{handle_event, Action, Config, Event, InputMode};

register_plugin!(State);

struct State {
    app: notepane::AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: notepane::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        notepane::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(
            resource = %config.resource,
            per_page = config.per_page,
            debounce_ms = config.debounce_ms,
            has_notehub_token = config.notehub_token.is_some(),
            has_tmdb_token = config.tmdb_token.is_some(),
            "parsed configuration"
        );
        self.app = notepane::initialize(&config);

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::Timer,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span_name = format!("plugin_update::{event_name}");
        let span = tracing::debug_span!("plugin_update_event", otel.name = %span_name, event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::Timer(_) => Event::Timer,
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match Self::map_web_request_result(status, body, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => Event::PermissionsResult {
                granted: matches!(status, PermissionStatus::Granted),
            },
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled successfully");
                for a in actions {
                    Self::execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        notepane::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, mode = ?self.app.input_mode, "key event");

        match self.app.input_mode {
            InputMode::Normal => Self::map_normal_key(key),
            InputMode::Search => Self::map_search_key(key),
            InputMode::Form(_) => Self::map_form_key(key),
        }
    }

    fn map_normal_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Right | BareKey::PageDown | BareKey::Char('l') => Event::NextPage,
            BareKey::Left | BareKey::PageUp | BareKey::Char('h') => Event::PreviousPage,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('n') => Event::NewNote,
            BareKey::Char('d') => Event::DeleteSelected,
            BareKey::Tab => Event::SwitchResource,
            BareKey::Char('r') => Event::Refetch,
            BareKey::Char('x') => Event::DismissError,
            BareKey::Char('q') | BareKey::Esc => Event::CloseFocus,
            _ => return None,
        })
    }

    fn map_search_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Enter => Event::SubmitSearch,
            BareKey::Esc => Event::ExitSearch,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) if !key.has_modifiers(&[KeyModifier::Ctrl]) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_form_key(key: &KeyWithModifier) -> Option<Event> {
        if key.bare_key == BareKey::Char('t') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::FormCycleTag);
        }

        Some(match key.bare_key {
            BareKey::Tab => Event::FormNextField,
            BareKey::Enter => Event::SubmitForm,
            BareKey::Esc => Event::CancelForm,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) if !key.has_modifiers(&[KeyModifier::Ctrl]) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_web_request_result(status: u16, body: Vec<u8>, context: &BTreeMap<String, String>) -> Option<Event> {
        let Some(id) = context.get(REQUEST_ID_CONTEXT_KEY).and_then(|raw| RequestId::parse(raw)) else {
            tracing::debug!(status, "web request result without a request id");
            return None;
        };

        Some(Event::HttpResponse(HttpResponse { id, status, body }))
    }

    #[tracing::instrument(level = "debug", skip(action))]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::Http(request) => {
                tracing::debug!(token = %request.id, method = ?request.method, url = %request.url, "sending request");
                let verb = match request.method {
                    Method::Get => HttpVerb::Get,
                    Method::Post => HttpVerb::Post,
                    Method::Delete => HttpVerb::Delete,
                };
                web_request(
                    &request.url,
                    verb,
                    request.headers.clone(),
                    request.body.clone(),
                    request.context(),
                );
            }
            Action::ScheduleTimer(delay) => {
                tracing::debug!(?delay, "scheduling timer");
                set_timeout(delay.as_secs_f64());
            }
        }
    }
}
