//! Search and pagination control.
//!
//! [`SearchController`] turns keystrokes and page requests into
//! [`ControllerEvent`]s carrying the next active [`QueryKey`](crate::cache::QueryKey).
//! It holds no I/O handles: debounce timing is deadline based, so callers
//! supply the current instant and schedule wake-ups themselves.

pub mod debounce;
pub mod search;

pub use debounce::{DebouncePoll, Debouncer, DEFAULT_WINDOW};
pub use search::{ChangeCause, ControllerEvent, SearchController};
