//! Records kept by the per-domain modules.
//!
//! Every record keeps the fields it does not know about in `extra`, so data
//! written by a newer module version survives a load/save cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A character sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Planning card of one chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    /// Names of the characters appearing in the chapter
    pub characters: Vec<String>,
    /// Names of the locations visited
    pub locations: Vec<String>,
    pub key_events: Vec<String>,
    pub summary: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chapter {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

/// An event on the story timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    /// In-story date, free text
    pub date: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A place in the story world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A research note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResearchEntry {
    pub id: String,
    pub title: String,
    pub source: String,
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Four-part story structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryStructure {
    pub beginning: String,
    pub conflict: String,
    pub climax: String,
    pub ending: String,
}
