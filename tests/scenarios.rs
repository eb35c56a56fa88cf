//! End-to-end scenarios driven through `handle_event` with a manual clock and
//! hand-written API responses.

use std::sync::Arc;
use std::time::Duration;

use notepane::app::NoticeLevel;
use notepane::domain::ResourceKind;
use notepane::gateway::{Gateway, HttpRequest, HttpResponse, Method};
use notepane::infrastructure::ManualClock;
use notepane::{handle_event, Action, AppState, Event, NotepaneError, Theme};

fn setup() -> (AppState, ManualClock) {
    let clock = ManualClock::new();
    let state = AppState::new(Gateway::default(), Theme::default()).with_clock(Arc::new(clock.clone()));
    (state, clock)
}

fn send(state: &mut AppState, event: Event) -> Vec<Action> {
    handle_event(state, &event).expect("event handled").1
}

fn requests(actions: &[Action]) -> Vec<HttpRequest> {
    actions
        .iter()
        .filter_map(|action| match action {
            Action::Http(request) => Some(request.clone()),
            _ => None,
        })
        .collect()
}

fn only_request(actions: &[Action]) -> HttpRequest {
    let mut all = requests(actions);
    assert_eq!(all.len(), 1, "expected exactly one request in {actions:?}");
    all.remove(0)
}

fn notes_page(ids: &[&str], total_pages: u32) -> String {
    let notes: Vec<String> = ids
        .iter()
        .map(|id| format!(r#"{{"id":"{id}","title":"Note {id}","content":"body {id}","tag":"Todo"}}"#))
        .collect();
    format!(r#"{{"notes":[{}],"totalPages":{total_pages}}}"#, notes.join(","))
}

fn respond(state: &mut AppState, request: &HttpRequest, status: u16, body: &str) -> Vec<Action> {
    send(
        state,
        Event::HttpResponse(HttpResponse {
            id: request.id,
            status,
            body: body.as_bytes().to_vec(),
        }),
    )
}

/// Grants web access and answers the first page with `ids`.
fn online_with(state: &mut AppState, ids: &[&str], total_pages: u32) -> HttpRequest {
    let first = only_request(&send(state, Event::PermissionsResult { granted: true }));
    respond(state, &first, 200, &notes_page(ids, total_pages));
    first
}

fn titles(state: &AppState) -> Vec<String> {
    state.current_items().iter().map(|item| item.title().to_string()).collect()
}

#[test]
fn nothing_is_fetched_before_permission() {
    let (mut state, _clock) = setup();
    assert!(requests(&send(&mut state, Event::Refetch)).is_empty());

    let actions = send(&mut state, Event::PermissionsResult { granted: true });
    let request = only_request(&actions);
    assert_eq!(request.method, Method::Get);
    assert!(request.url.contains("/notes?page=1&perPage=12"));
}

#[test]
fn typing_settles_into_one_search() {
    let (mut state, clock) = setup();
    online_with(&mut state, &["a", "b"], 3);
    send(&mut state, Event::SearchMode);

    for c in "abc".chars() {
        let actions = send(&mut state, Event::Char(c));
        assert!(requests(&actions).is_empty());
        clock.advance(Duration::from_millis(100));
    }
    send(&mut state, Event::Char('d'));

    clock.advance(Duration::from_millis(300));
    let early = send(&mut state, Event::Timer);
    assert!(requests(&early).is_empty());
    assert_eq!(early, vec![Action::ScheduleTimer(Duration::from_millis(200))]);

    clock.advance(Duration::from_millis(200));
    let request = only_request(&send(&mut state, Event::Timer));
    assert!(request.url.contains("page=1"));
    assert!(request.url.ends_with("search=abcd"));
    assert_eq!(state.controller.settled_term(), "abcd");

    clock.advance(Duration::from_secs(1));
    let (render, actions) = handle_event(&mut state, &Event::Timer).unwrap();
    assert!(!render);
    assert!(actions.is_empty());
}

#[test]
fn settling_on_a_cached_term_redraws() {
    let (mut state, clock) = setup();
    online_with(&mut state, &["a"], 1);
    send(&mut state, Event::SearchMode);
    send(&mut state, Event::Char('z'));
    clock.advance(Duration::from_millis(500));
    let search = only_request(&send(&mut state, Event::Timer));
    respond(&mut state, &search, 200, &notes_page(&["z"], 1));

    send(&mut state, Event::Backspace);
    clock.advance(Duration::from_millis(500));
    let (render, actions) = handle_event(&mut state, &Event::Timer).unwrap();

    assert!(render);
    assert!(actions.is_empty(), "first page is served from the cache");
    assert_eq!(state.controller.settled_term(), "");
    assert_eq!(titles(&state), ["Note a"]);
}

#[test]
fn settling_on_an_unchanged_term_redraws() {
    let (mut state, clock) = setup();
    online_with(&mut state, &["a"], 1);
    send(&mut state, Event::SearchMode);
    send(&mut state, Event::Char('z'));
    send(&mut state, Event::Backspace);
    assert!(state.controller.is_settling());

    clock.advance(Duration::from_millis(500));
    let (render, actions) = handle_event(&mut state, &Event::Timer).unwrap();

    assert!(render);
    assert!(actions.is_empty());
    assert!(!state.controller.is_settling());
    assert!(state.compute_viewmodel(24, 100).status.activity.is_none());
}

#[test]
fn failed_page_can_be_left() {
    let (mut state, _clock) = setup();
    online_with(&mut state, &["a"], 3);
    let second = only_request(&send(&mut state, Event::NextPage));
    respond(&mut state, &second, 500, r#"{"message":"boom"}"#);
    assert_eq!(state.controller.total_pages(), 3);

    let actions = send(&mut state, Event::PreviousPage);
    assert!(requests(&actions).is_empty());
    assert_eq!(state.controller.current_page(), 1);
    assert_eq!(titles(&state), ["Note a"]);
}

#[test]
fn new_search_term_resets_to_first_page() {
    let (mut state, clock) = setup();
    online_with(&mut state, &["a"], 4);
    let second = only_request(&send(&mut state, Event::NextPage));
    respond(&mut state, &second, 200, &notes_page(&["b"], 4));
    assert_eq!(state.controller.current_page(), 2);

    send(&mut state, Event::SearchMode);
    send(&mut state, Event::Char('x'));
    clock.advance(Duration::from_millis(500));
    let request = only_request(&send(&mut state, Event::Timer));

    assert_eq!(state.controller.current_page(), 1);
    assert!(request.url.contains("page=1"));
}

#[test]
fn page_past_the_end_is_ignored() {
    let (mut state, _clock) = setup();
    online_with(&mut state, &["a"], 5);

    for page in 2..=5 {
        let request = only_request(&send(&mut state, Event::NextPage));
        assert!(request.url.contains(&format!("page={page}")));
    }
    assert_eq!(state.controller.current_page(), 5);

    let actions = send(&mut state, Event::NextPage);
    assert!(actions.is_empty());
    assert_eq!(state.controller.current_page(), 5);
}

#[test]
fn previous_page_loads_from_cache() {
    let (mut state, _clock) = setup();
    online_with(&mut state, &["a", "b"], 2);

    let second = only_request(&send(&mut state, Event::NextPage));
    assert_eq!(titles(&state), ["Note a", "Note b"], "previous page shown while loading");
    respond(&mut state, &second, 200, &notes_page(&["c"], 2));
    assert_eq!(titles(&state), ["Note c"]);

    let actions = send(&mut state, Event::PreviousPage);
    assert!(requests(&actions).is_empty());
    assert_eq!(titles(&state), ["Note a", "Note b"]);
}

#[test]
fn created_note_invalidates_and_refetches() {
    let (mut state, _clock) = setup();
    online_with(&mut state, &["a"], 2);
    let second = only_request(&send(&mut state, Event::NextPage));
    respond(&mut state, &second, 200, &notes_page(&["b"], 2));
    send(&mut state, Event::PreviousPage);

    send(&mut state, Event::NewNote);
    for c in "Milk".chars() {
        send(&mut state, Event::Char(c));
    }
    let post = only_request(&send(&mut state, Event::SubmitForm));
    assert_eq!(post.method, Method::Post);
    assert!(state.coordinator.is_creating());

    let actions = respond(
        &mut state,
        &post,
        201,
        r#"{"id":"new","title":"Milk","content":"","tag":"Shopping"}"#,
    );
    let refetch = only_request(&actions);
    assert_eq!(refetch.method, Method::Get);
    assert!(refetch.url.contains("page=1"));

    let other_page = state.controller.query_key().with_page(2);
    assert!(state.cache.view(&other_page).is_stale);
    assert_eq!(titles(&state), ["Note a"], "stale rows stay until the refetch lands");

    let notice = state.notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Note \"Milk\" created");
    assert!(state.form.title.is_empty());
    assert!(!state.input_mode.captures_text());
}

#[test]
fn failed_delete_leaves_cache_alone() {
    let (mut state, _clock) = setup();
    online_with(&mut state, &["a", "b"], 1);
    let key = state.active_key();

    let delete = only_request(&send(&mut state, Event::DeleteSelected));
    assert_eq!(delete.method, Method::Delete);
    assert!(delete.url.ends_with("/notes/a"));

    let actions = respond(&mut state, &delete, 404, r#"{"message":"Note not found"}"#);
    assert!(requests(&actions).is_empty());

    let notice = state.notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.starts_with("Error deleting note"));

    let view = state.cache.view(&key);
    assert!(!view.is_stale);
    assert_eq!(view.data.map(|page| page.items.len()), Some(2));
}

#[test]
fn superseded_response_is_dropped() {
    let (mut state, _clock) = setup();
    let first = only_request(&send(&mut state, Event::PermissionsResult { granted: true }));

    send(&mut state, Event::NewNote);
    send(&mut state, Event::Char('x'));
    let post = only_request(&send(&mut state, Event::SubmitForm));
    let refetch = only_request(&respond(&mut state, &post, 201, r#"{"id":"x","title":"x"}"#));
    assert_ne!(refetch.id, first.id);

    respond(&mut state, &refetch, 200, &notes_page(&["fresh"], 1));
    respond(&mut state, &first, 200, &notes_page(&["old"], 1));

    assert_eq!(titles(&state), ["Note fresh"]);
}

#[test]
fn repeated_failure_notifies_once() {
    let (mut state, _clock) = setup();
    let first = only_request(&send(&mut state, Event::PermissionsResult { granted: true }));
    respond(&mut state, &first, 500, r#"{"message":"boom"}"#);
    assert_eq!(state.notices.len(), 1);

    let retry = only_request(&send(&mut state, Event::Refetch));
    respond(&mut state, &retry, 500, r#"{"message":"boom"}"#);
    assert_eq!(state.notices.len(), 1);
    assert_eq!(state.notices.latest().unwrap().level, NoticeLevel::Error);
}

#[test]
fn empty_search_result_is_reported() {
    let (mut state, clock) = setup();
    online_with(&mut state, &["a"], 1);
    send(&mut state, Event::SearchMode);
    send(&mut state, Event::Char('z'));
    clock.advance(Duration::from_millis(500));
    let search = only_request(&send(&mut state, Event::Timer));

    respond(&mut state, &search, 200, &notes_page(&[], 0));

    let notice = state.notices.latest().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.message, "No notes found for your request.");
}

#[test]
fn movies_wait_for_a_search_term() {
    let (mut state, clock) = setup();
    online_with(&mut state, &["a"], 1);

    let actions = send(&mut state, Event::SwitchResource);
    assert!(requests(&actions).is_empty());
    assert_eq!(state.resource(), ResourceKind::Movies);

    send(&mut state, Event::SearchMode);
    send(&mut state, Event::Char('q'));
    clock.advance(Duration::from_millis(500));
    let search = only_request(&send(&mut state, Event::Timer));
    assert!(search.url.contains("/search/movie?"));
}

#[test]
fn unknown_response_is_an_error() {
    let (mut state, _clock) = setup();
    let stray = Event::HttpResponse(HttpResponse {
        id: notepane::gateway::RequestId::new(42),
        status: 200,
        body: Vec::new(),
    });

    assert!(matches!(
        handle_event(&mut state, &stray),
        Err(NotepaneError::UnknownRequest(42))
    ));
}
