//! Application message types for JadeScroll.
//!
//! Raw page events go through the listener registry, which turns them into
//! [`Message`]s in the Elm architecture style.

use crate::constants::{CHAPTER_TITLE_ID, WRITING_EDITOR_ID};
use crate::model::ModuleId;

/// Editable fields watched by the autosave system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// The main writing editor; its text is what change detection compares
    WritingEditor,
    /// Title of the current chapter
    ChapterTitle,
}

impl FieldId {
    /// All watched fields.
    pub fn all() -> &'static [FieldId] {
        &[FieldId::WritingEditor, FieldId::ChapterTitle]
    }

    /// DOM id of the field's element.
    pub fn element_id(self) -> &'static str {
        match self {
            FieldId::WritingEditor => WRITING_EDITOR_ID,
            FieldId::ChapterTitle => CHAPTER_TITLE_ID,
        }
    }
}

/// Events as the page (or terminal) delivers them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// Field content changed; carries the full new value
    Input { field: FieldId, value: String },
    /// Field lost focus
    Blur { field: FieldId },
    /// Field gained focus; carries its current value
    Focus { field: FieldId, value: String },
    /// Named document-level notification raised by another module
    Custom { name: String },
}

/// Messages that can be sent to update application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Field content changed
    FieldInput { field: FieldId, value: String },
    /// Field lost focus
    FieldBlurred(FieldId),
    /// Field gained focus
    FieldFocused { field: FieldId, value: String },
    /// Character module changed its data
    CharacterUpdated,
    /// Chapter module changed its data
    ChapterUpdated,
    /// Switch the active content panel
    SwitchModule(ModuleId),
}
