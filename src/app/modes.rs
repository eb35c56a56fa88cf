//! Input mode state machine.
//!
//! The mode decides how key presses are interpreted:
//!
//! - **Normal**: navigation, paging and commands
//! - **Search**: typed characters edit the search input
//! - **Form**: typed characters edit the focused field of the new-note form
//!
//! ```
//! use notepane::app::{FormField, InputMode};
//!
//! let mode = InputMode::Form(FormField::Title);
//! assert!(mode.captures_text());
//! assert!(!InputMode::Normal.captures_text());
//! ```

/// Field of the new-note form that receives typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Body,
}

impl FormField {
    /// The other field. `Tab` toggles between them.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Title => Self::Body,
            Self::Body => Self::Title,
        }
    }
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Default navigation and command mode.
    ///
    /// Keys: j/k move, h/l page, / search, n new note, d delete, Tab switch
    /// collection, r refetch, x dismiss error, q quit.
    #[default]
    Normal,

    /// Editing the search input. Enter keeps the query, Esc clears it.
    Search,

    /// Editing the new-note form, with the given field focused.
    Form(FormField),
}

impl InputMode {
    /// Whether plain characters are text input rather than commands.
    #[must_use]
    pub const fn captures_text(self) -> bool {
        !matches!(self, Self::Normal)
    }
}
