//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (`main.rs`) and the core components
//! (controller, cache, mutation coordinator, gateway).
//!
//! # Architecture
//!
//! ```text
//! Key / Timer / HttpResponse → Event → handle_event → AppState → Vec<Action>
//!        ↑                                                          │
//!        └──────── web_request / set_timeout results ───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input mode state machine
//! - [`form`]: New-note form draft
//! - [`notices`]: Expiring notification queue
//! - [`state`]: Central state container and view model computation

pub mod actions;
pub mod form;
pub mod handler;
pub mod modes;
pub mod notices;
pub mod state;

pub use actions::Action;
pub use form::NoteForm;
pub use handler::{handle_event, Event};
pub use modes::{FormField, InputMode};
pub use notices::{Notice, NoticeLevel, Notices};
pub use state::AppState;
