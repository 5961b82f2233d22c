//! Global constants for the JadeScroll application

/// Local storage key holding the serialized application state
pub const STATE_KEY: &str = "jadeScrollData";

/// Local storage key holding the raw editor content of the last successful save
pub const LAST_SAVED_CONTENT_KEY: &str = "lastSavedContent";

/// Key written and removed again by the storage health probe
pub const HEALTH_PROBE_KEY: &str = "healthCheck";

/// Local storage key for configuration persistence
pub const CONFIG_KEY: &str = "jadescroll-config";

/// Element id of the main writing editor
pub const WRITING_EDITOR_ID: &str = "writingEditor";

/// Element id of the chapter title input
pub const CHAPTER_TITLE_ID: &str = "chapterTitle";

/// Element id of the save status label
pub const SAVE_STATUS_TEXT_ID: &str = "saveStatusText";

/// Class of the save status container
pub const SAVE_STATUS_CONTAINER_CLASS: &str = "save-status-inline";

/// Class of the online/offline indicator
pub const STATUS_INDICATOR_CLASS: &str = "status-indicator";

/// Elements the health check expects to find on the page
pub const REQUIRED_ELEMENT_IDS: &[&str] = &["sidebar", "saveStatus"];

/// Custom document event raised by the character module
pub const CHARACTER_UPDATED_EVENT: &str = "characterUpdated";

/// Custom document event raised by the chapter module
pub const CHAPTER_UPDATED_EVENT: &str = "chapterUpdated";

/// Fraction of health checks that must pass before the system is considered degraded
pub const HEALTH_PASS_RATIO: f64 = 0.75;

// Save timing defaults (milliseconds)

/// Quiet period before a debounced save runs
pub const DEFAULT_DEBOUNCE_MS: u64 = 3000;

/// Window of the throttled input handler
pub const DEFAULT_THROTTLE_MS: u64 = 500;

/// Heartbeat period
pub const DEFAULT_HEARTBEAT_MS: u64 = 60_000;

/// Age of the last save after which the heartbeat forces a save
pub const DEFAULT_STALE_AFTER_MS: u64 = 60_000;

/// Age of the last save after which leaving a field triggers a save
pub const DEFAULT_BLUR_MIN_MS: u64 = 1000;

/// Delay before a "saved" status reverts to "ready"
pub const DEFAULT_SAVED_RESET_MS: u64 = 4000;

/// Delay before an "error" status reverts to "ready"
pub const DEFAULT_ERROR_RESET_MS: u64 = 5000;

/// How often the drivers call `tick`
pub const TICK_INTERVAL_MS: u64 = 100;
