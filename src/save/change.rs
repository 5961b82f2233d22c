//! Change detection against the last saved content.

/// Whether `current` differs from the content of the last successful save.
///
/// Plain byte equality: whitespace-only edits count as changes.
pub fn has_changed(current: &str, last_saved: &str) -> bool {
    current != last_saved
}
