//! The application state record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::records::{Chapter, Character, Location, ResearchEntry, StoryStructure, TimelineEvent};

/// Content panels of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    #[default]
    Writing,
    Characters,
    Chapters,
    Timeline,
    World,
    Research,
    Structure,
}

impl ModuleId {
    /// All modules in sidebar order.
    pub fn all() -> &'static [ModuleId] {
        &[
            ModuleId::Writing,
            ModuleId::Characters,
            ModuleId::Chapters,
            ModuleId::Timeline,
            ModuleId::World,
            ModuleId::Research,
            ModuleId::Structure,
        ]
    }

    /// Identifier used in the persisted snapshot and in `data-module` attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleId::Writing => "writing",
            ModuleId::Characters => "characters",
            ModuleId::Chapters => "chapters",
            ModuleId::Timeline => "timeline",
            ModuleId::World => "world",
            ModuleId::Research => "research",
            ModuleId::Structure => "structure",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleId::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| StateError::UnknownModule(s.to_string()))
    }
}

/// The chapter open in the writing editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentChapter {
    pub title: String,
    pub content: String,
}

/// Everything the application persists, serialized wholesale on every save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    pub current_module: ModuleId,
    pub characters: Vec<Character>,
    pub chapters: Vec<Chapter>,
    pub timeline: Vec<TimelineEvent>,
    pub locations: Vec<Location>,
    pub research: Vec<ResearchEntry>,
    pub story_structure: StoryStructure,
    pub current_chapter: CurrentChapter,
    pub is_connected: bool,
    /// Top-level keys written by other modules that this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppState {
    /// Fresh state with empty defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the whole state to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Merge a persisted snapshot over this state.
    ///
    /// The merge is shallow: every top-level key present in `json` replaces
    /// the current value wholesale, keys absent from `json` keep their
    /// current value. On error the state is left untouched.
    pub fn merge_snapshot(&mut self, json: &str) -> Result<(), StateError> {
        let Value::Object(incoming) = serde_json::from_str::<Value>(json)? else {
            return Err(StateError::NotAnObject);
        };

        let mut merged = serde_json::to_value(&*self)?;
        if let Value::Object(current) = &mut merged {
            current.extend(incoming);
        }

        *self = serde_json::from_value(merged)?;
        Ok(())
    }
}

/// Errors raised while reading persisted state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Snapshot is not valid JSON or does not fit the state shape
    #[error("Malformed state snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot is valid JSON but not an object
    #[error("State snapshot is not a JSON object")]
    NotAnObject,

    /// A module name that does not exist
    #[error("Unknown module: {0}")]
    UnknownModule(String),
}
