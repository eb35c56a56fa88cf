//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place where [`AppState`] changes. Events come
//! from key presses, timers and completed web requests. Every effect the
//! handler needs is returned as an [`Action`] for the plugin shim to execute.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `NextPage`, `PreviousPage`
//! - **Search**: `SearchMode`, `Char`, `Backspace`, `SubmitSearch`, `ExitSearch`
//! - **Mutations**: `NewNote`, `FormNextField`, `FormCycleTag`, `SubmitForm`,
//!   `CancelForm`, `DeleteSelected`
//! - **Commands**: `SwitchResource`, `Refetch`, `DismissError`, `CloseFocus`
//! - **System**: `Timer`, `HttpResponse`, `PermissionsResult`
//!
//! # Example
//!
//! ```
//! use notepane::app::{handle_event, Action, AppState, Event};
//! use notepane::gateway::Gateway;
//! use notepane::ui::Theme;
//!
//! let mut state = AppState::new(Gateway::default(), Theme::default());
//! let (_render, actions) = handle_event(&mut state, &Event::PermissionsResult { granted: true })?;
//! assert!(matches!(actions.as_slice(), [Action::Http(_)]));
//! # Ok::<(), notepane::NotepaneError>(())
//! ```

use super::modes::{FormField, InputMode};
use super::notices::NoticeLevel;
use crate::app::{Action, AppState};
use crate::cache::Resolution;
use crate::domain::error::{NotepaneError, Result};
use crate::gateway::{GatewayError, HttpResponse};
use crate::mutation::{MutationEvent, MutationOp};

/// Events triggered by user input, timers, or completed requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves selection down one row (wraps to top).
    KeyDown,
    /// Moves selection up one row (wraps to bottom).
    KeyUp,
    /// Goes to the next page, if there is one.
    NextPage,
    /// Goes to the previous page, if there is one.
    PreviousPage,

    /// Focuses the search input.
    SearchMode,
    /// Types a character into the search input or the focused form field.
    Char(char),
    /// Deletes the last character of the search input or focused form field.
    Backspace,
    /// Settles the search input now and returns to normal mode.
    SubmitSearch,
    /// Clears the search and returns to normal mode.
    ExitSearch,

    /// Opens the new-note form.
    NewNote,
    /// Moves focus to the other form field.
    FormNextField,
    /// Cycles the tag of the draft note.
    FormCycleTag,
    /// Creates the drafted note.
    SubmitForm,
    /// Closes the form without creating anything.
    CancelForm,
    /// Deletes the selected item.
    DeleteSelected,

    /// Switches between notes and movies.
    SwitchResource,
    /// Re-requests the active page even if it is cached.
    Refetch,
    /// Forgets the active page's error and loads it from scratch.
    DismissError,
    /// Hides the plugin.
    CloseFocus,

    /// A scheduled timer fired.
    Timer,

    /// A web request finished, successfully or not.
    HttpResponse(HttpResponse),

    /// The user answered the permission prompt.
    PermissionsResult {
        /// Whether web access was granted.
        granted: bool,
    },
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// # Returns
///
/// `(should_render, actions)`. Actions must be executed in order.
///
/// # Errors
///
/// Returns [`NotepaneError::UnknownRequest`] when a response carries an id
/// the plugin never issued. State is left untouched in that case.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    let actions = match event {
        Event::KeyDown => {
            state.move_selection_down();
            Vec::new()
        }
        Event::KeyUp => {
            state.move_selection_up();
            Vec::new()
        }
        Event::NextPage => {
            let events = state.controller.next_page();
            state.apply_controller_events(events)
        }
        Event::PreviousPage => {
            let events = state.controller.previous_page();
            state.apply_controller_events(events)
        }

        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search;
            Vec::new()
        }
        Event::Char(c) => match state.input_mode {
            InputMode::Search => {
                let mut text = state.controller.raw_input().to_string();
                text.push(*c);
                let now = state.now();
                let delay = state.controller.on_search_input(text, now);
                vec![Action::ScheduleTimer(delay)]
            }
            InputMode::Form(_) => {
                state.form.push(*c);
                Vec::new()
            }
            InputMode::Normal => return Ok((false, Vec::new())),
        },
        Event::Backspace => match state.input_mode {
            InputMode::Search => {
                let mut text = state.controller.raw_input().to_string();
                if text.pop().is_none() {
                    return Ok((false, Vec::new()));
                }
                let now = state.now();
                let delay = state.controller.on_search_input(text, now);
                vec![Action::ScheduleTimer(delay)]
            }
            InputMode::Form(_) => {
                state.form.pop();
                Vec::new()
            }
            InputMode::Normal => return Ok((false, Vec::new())),
        },
        Event::SubmitSearch => {
            tracing::debug!(query = %state.controller.raw_input(), "keeping search query");
            state.input_mode = InputMode::Normal;
            let events = state.controller.flush();
            state.apply_controller_events(events)
        }
        Event::ExitSearch => {
            tracing::debug!("clearing search");
            state.input_mode = InputMode::Normal;
            let events = state.controller.clear();
            state.apply_controller_events(events)
        }

        Event::NewNote => {
            if !state.resource().supports_mutations() {
                let message = GatewayError::read_only(state.resource().title()).describe();
                vec![state.notify(NoticeLevel::Error, message)]
            } else {
                state.input_mode = InputMode::Form(state.form.field);
                Vec::new()
            }
        }
        Event::FormNextField => {
            state.form.next_field();
            if let InputMode::Form(_) = state.input_mode {
                state.input_mode = InputMode::Form(state.form.field);
            }
            Vec::new()
        }
        Event::FormCycleTag => {
            state.form.cycle_tag();
            Vec::new()
        }
        Event::SubmitForm => submit_form(state),
        Event::CancelForm => {
            state.input_mode = InputMode::Normal;
            state.form.field = FormField::Title;
            Vec::new()
        }
        Event::DeleteSelected => delete_selected(state),

        Event::SwitchResource => {
            let next = state.resource().next();
            tracing::debug!(resource = %next, "switching resource");
            state.input_mode = InputMode::Normal;
            let events = state.controller.set_resource(next);
            state.apply_controller_events(events)
        }
        Event::Refetch => state.refetch_active(),
        Event::DismissError => {
            let key = state.active_key();
            let removed = state.cache.remove(|k| *k == key);
            state.notices.clear_errors();
            tracing::debug!(key = %key, removed, "error dismissed");
            state.sync_active_query()
        }
        Event::CloseFocus => vec![Action::CloseFocus],

        Event::Timer => {
            let now = state.now();
            let was_settling = state.controller.is_settling();
            let mut actions = Vec::new();
            if let Some(event) = state.controller.poll(now) {
                actions.extend(state.apply_controller_events([event]));
            } else if let Some(left) = state.controller.remaining(now) {
                actions.push(Action::ScheduleTimer(left));
            }
            let settled = was_settling && !state.controller.is_settling();
            let expired = state.notices.prune(now);
            if !settled && !expired && actions.is_empty() {
                return Ok((false, Vec::new()));
            }
            actions
        }

        Event::HttpResponse(response) => handle_response(state, response)?,

        Event::PermissionsResult { granted } => {
            state.online = *granted;
            if *granted {
                tracing::debug!("web access granted");
                state.sync_active_query()
            } else {
                tracing::warn!("web access denied");
                Vec::new()
            }
        }
    };

    Ok((true, actions))
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::KeyDown => "KeyDown",
        Event::KeyUp => "KeyUp",
        Event::NextPage => "NextPage",
        Event::PreviousPage => "PreviousPage",
        Event::SearchMode => "SearchMode",
        Event::Char(_) => "Char",
        Event::Backspace => "Backspace",
        Event::SubmitSearch => "SubmitSearch",
        Event::ExitSearch => "ExitSearch",
        Event::NewNote => "NewNote",
        Event::FormNextField => "FormNextField",
        Event::FormCycleTag => "FormCycleTag",
        Event::SubmitForm => "SubmitForm",
        Event::CancelForm => "CancelForm",
        Event::DeleteSelected => "DeleteSelected",
        Event::SwitchResource => "SwitchResource",
        Event::Refetch => "Refetch",
        Event::DismissError => "DismissError",
        Event::CloseFocus => "CloseFocus",
        Event::Timer => "Timer",
        Event::HttpResponse(_) => "HttpResponse",
        Event::PermissionsResult { .. } => "PermissionsResult",
    }
}

fn submit_form(state: &mut AppState) -> Vec<Action> {
    if !state.online {
        return vec![state.notify(NoticeLevel::Error, "No web access")];
    }

    let resource = state.resource();
    let note = state.form.to_new_note();
    match state
        .coordinator
        .begin_create(resource, &note, &state.gateway, &mut state.request_ids)
    {
        Ok(Some(request)) => vec![Action::Http(request)],
        Ok(None) => {
            tracing::debug!("create already pending, submit ignored");
            Vec::new()
        }
        Err(event) => vec![state.notify(NoticeLevel::Error, event.message())],
    }
}

fn delete_selected(state: &mut AppState) -> Vec<Action> {
    let resource = state.resource();
    if !resource.supports_mutations() {
        let message = GatewayError::read_only(resource.title()).describe();
        return vec![state.notify(NoticeLevel::Error, message)];
    }
    if !state.online {
        return Vec::new();
    }
    let Some(item) = state.selected_item().map(|item| item.id().clone()) else {
        tracing::debug!("nothing selected to delete");
        return Vec::new();
    };

    match state
        .coordinator
        .begin_delete(resource, &item, &state.gateway, &mut state.request_ids)
    {
        Ok(Some(request)) => vec![Action::Http(request)],
        Ok(None) => Vec::new(),
        Err(event) => vec![state.notify(NoticeLevel::Error, event.message())],
    }
}

fn handle_response(state: &mut AppState, response: &HttpResponse) -> Result<Vec<Action>> {
    tracing::debug!(token = %response.id, status = response.status, bytes = response.body.len(), "response");

    if state.coordinator.owns(response.id) {
        let Some(event) = state.coordinator.complete(&state.gateway, response) else {
            return Ok(Vec::new());
        };
        return Ok(apply_mutation_event(state, event));
    }

    let Some(key) = state.page_requests.remove(&response.id) else {
        return Err(NotepaneError::UnknownRequest(response.id.get()));
    };

    let result = state.gateway.decode_page(&key, response);
    let now = state.now();
    let mut actions = Vec::new();

    match state.cache.resolve(response.id, result, now) {
        Resolution::Applied { key, notify_error } => {
            if notify_error {
                if let Some(error) = state.cache.entry(&key).and_then(|entry| entry.error.clone()) {
                    let message = format!("Failed to load {}: {}", key.resource.as_str(), error.describe());
                    actions.push(state.notify(NoticeLevel::Error, message));
                }
            }
            actions.extend(state.report_if_empty(&key));
        }
        Resolution::Discarded => {
            tracing::debug!(key = %key, token = %response.id, "superseded response dropped");
        }
    }

    state.refresh_pagination();
    Ok(actions)
}

fn apply_mutation_event(state: &mut AppState, event: MutationEvent) -> Vec<Action> {
    let mut actions = Vec::new();
    let message = event.message();

    match &event {
        MutationEvent::Succeeded { resource, op, .. } => {
            let invalidated = state.cache.invalidate_resource(*resource);
            state.forget_empty_reports(*resource);
            tracing::debug!(%resource, %op, invalidated, "cache invalidated after mutation");

            if *op == MutationOp::Create {
                state.form.reset();
                if matches!(state.input_mode, InputMode::Form(_)) {
                    state.input_mode = InputMode::Normal;
                }
            }
            actions.push(state.notify(NoticeLevel::Success, message));
            if state.resource() == *resource {
                actions.extend(state.sync_active_query());
            }
        }
        MutationEvent::Failed { .. } => {
            actions.push(state.notify(NoticeLevel::Error, message));
        }
    }

    actions
}
