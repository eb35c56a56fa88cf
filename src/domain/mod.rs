//! Domain layer for the notepane plugin.
//!
//! Types shared by every other layer, free of Zellij APIs and HTTP details.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`resource`]: The remote collections that can be browsed
//! - [`item`]: Notes, movies and the note creation payload
//! - [`page`]: A page of items with pagination metadata
//!
//! # Examples
//!
//! ```
//! use notepane::domain::{NewNote, NoteTag, ResourceKind};
//!
//! let draft = NewNote {
//!     title: "Standup".to_string(),
//!     body: "Agenda".to_string(),
//!     tag: NoteTag::Meeting,
//! };
//! assert!(ResourceKind::Notes.supports_mutations());
//! assert_eq!(draft.tag.as_str(), "Meeting");
//! ```

pub mod error;
pub mod item;
pub mod page;
pub mod resource;

pub use error::{NotepaneError, Result};
pub use item::{Item, ItemId, Movie, NewNote, Note, NoteTag};
pub use page::PageResult;
pub use resource::ResourceKind;
