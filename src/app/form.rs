//! Draft state of the new-note form.

use super::modes::FormField;
use crate::domain::{NewNote, NoteTag};

/// What the user has typed into the new-note form so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub body: String,
    pub tag: NoteTag,
    pub field: FormField,
}

impl NoteForm {
    fn focused(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Body => &mut self.body,
        }
    }

    pub fn push(&mut self, c: char) {
        self.focused().push(c);
    }

    pub fn pop(&mut self) {
        self.focused().pop();
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn cycle_tag(&mut self) {
        self.tag = self.tag.cycle();
    }

    /// The create payload, with surrounding whitespace trimmed.
    #[must_use]
    pub fn to_new_note(&self) -> NewNote {
        NewNote {
            title: self.title.trim().to_string(),
            body: self.body.trim().to_string(),
            tag: self.tag,
        }
    }

    /// Empties the form for the next note.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = NoteForm::default();
        "Plan".chars().for_each(|c| form.push(c));
        form.next_field();
        " q3 ".chars().for_each(|c| form.push(c));
        form.pop();
        form.cycle_tag();

        let note = form.to_new_note();
        assert_eq!(note.title, "Plan");
        assert_eq!(note.body, "q3");
        assert_eq!(note.tag, NoteTag::Meeting);

        form.reset();
        assert_eq!(form, NoteForm::default());
    }
}
