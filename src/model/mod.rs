//! Story data model.
//!
//! The per-domain modules (characters, chapters, timeline, world, research,
//! structure) own the rendering of these records; this crate only needs them
//! to round-trip through the persisted snapshot intact.

mod records;
mod state;

pub use records::{Chapter, Character, Location, ResearchEntry, StoryStructure, TimelineEvent};
pub use state::{AppState, CurrentChapter, ModuleId, StateError};
