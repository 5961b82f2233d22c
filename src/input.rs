//! Input binding for the autosave system.
//!
//! Binds the watched fields and the custom update notifications to
//! [`Message`]s, and owns the per-field throttles of the input handler.
//! Binding is idempotent: each call renews the listener scope, which tears
//! down everything the previous call registered.

use std::collections::HashMap;

use jadescroll_ui::{ListenerRegistry, ScopeToken, Throttle};
use web_time::{Duration, Instant};

use crate::constants::{CHAPTER_UPDATED_EVENT, CHARACTER_UPDATED_EVENT};
use crate::message::{FieldId, Message, RawEvent};

/// Throttled input that is due, ready to be turned into a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottledInput {
    pub field: FieldId,
    /// Length of the field value, in characters
    pub len: usize,
}

/// Watches editable fields and update notifications.
#[derive(Debug)]
pub struct InputBinder {
    throttles: HashMap<FieldId, Throttle<usize>>,
    throttle_window: Duration,
    blur_min: Duration,
}

impl InputBinder {
    pub fn new(throttle_window: Duration, blur_min: Duration) -> Self {
        Self {
            throttles: HashMap::new(),
            throttle_window,
            blur_min,
        }
    }

    /// Register the field and notification handlers, replacing any earlier binding.
    pub fn bind(&mut self, registry: &mut ListenerRegistry<RawEvent, Message>) -> ScopeToken {
        let scope = registry.renew_scope();

        for &field in FieldId::all() {
            registry.register(scope, move |event| match event {
                RawEvent::Input { field: f, value } if f == field => {
                    Some(Message::FieldInput { field, value })
                }
                RawEvent::Blur { field: f } if f == field => Some(Message::FieldBlurred(field)),
                RawEvent::Focus { field: f, value } if f == field => {
                    Some(Message::FieldFocused { field, value })
                }
                _ => None,
            });
            log::debug!("✅ Auto-save bound to: {}", field.element_id());
        }

        registry.register(scope, |event| match event {
            RawEvent::Custom { name } if name == CHARACTER_UPDATED_EVENT => {
                Some(Message::CharacterUpdated)
            }
            RawEvent::Custom { name } if name == CHAPTER_UPDATED_EVENT => {
                Some(Message::ChapterUpdated)
            }
            _ => None,
        });

        self.throttles = FieldId::all()
            .iter()
            .map(|&field| (field, Throttle::new(self.throttle_window)))
            .collect();
        log::info!("💾 Auto-save bindings ready");
        scope
    }

    /// Feed a field change through the field's throttle.
    ///
    /// Returns the input when it should be acted on immediately; otherwise
    /// it is deferred and comes out of [`poll`](Self::poll).
    pub fn on_input(&mut self, field: FieldId, value: &str, now: Instant) -> Option<ThrottledInput> {
        let len = value.chars().count();
        let throttle = self
            .throttles
            .entry(field)
            .or_insert_with(|| Throttle::new(self.throttle_window));
        throttle
            .call(len, now)
            .map(|len| ThrottledInput { field, len })
    }

    /// Deferred inputs whose throttle window has closed.
    pub fn poll(&mut self, now: Instant) -> Vec<ThrottledInput> {
        self.throttles
            .iter_mut()
            .filter_map(|(&field, throttle)| {
                throttle.poll(now).map(|len| ThrottledInput { field, len })
            })
            .collect()
    }

    /// Leaving a field saves only if the last save is older than the blur minimum.
    pub fn should_save_on_blur(&self, since_last_save: Option<Duration>) -> bool {
        since_last_save.is_none_or(|age| age > self.blur_min)
    }

    /// Focusing a non-empty field resets the status to "ready".
    pub fn should_reset_on_focus(value: &str) -> bool {
        !value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binder() -> InputBinder {
        InputBinder::new(Duration::from_millis(500), Duration::from_secs(1))
    }

    #[test]
    fn test_bind_maps_raw_events() {
        let mut registry = ListenerRegistry::new();
        binder().bind(&mut registry);

        let input = RawEvent::Input {
            field: FieldId::WritingEditor,
            value: "Hello".to_string(),
        };
        assert_eq!(
            registry.dispatch(&input),
            vec![Message::FieldInput {
                field: FieldId::WritingEditor,
                value: "Hello".to_string()
            }]
        );
        assert_eq!(
            registry.dispatch(&RawEvent::Blur {
                field: FieldId::ChapterTitle
            }),
            vec![Message::FieldBlurred(FieldId::ChapterTitle)]
        );
        assert_eq!(
            registry.dispatch(&RawEvent::Custom {
                name: CHARACTER_UPDATED_EVENT.to_string()
            }),
            vec![Message::CharacterUpdated]
        );
        assert!(registry
            .dispatch(&RawEvent::Custom {
                name: "somethingElse".to_string()
            })
            .is_empty());
    }

    #[test]
    fn test_rebinding_does_not_duplicate_handlers() {
        let mut registry = ListenerRegistry::new();
        let mut binder = binder();
        let first = binder.bind(&mut registry);
        let second = binder.bind(&mut registry);

        assert_ne!(first, second);
        assert!(!registry.is_live(first));
        assert_eq!(
            registry
                .dispatch(&RawEvent::Custom {
                    name: CHAPTER_UPDATED_EVENT.to_string()
                })
                .len(),
            1
        );
    }

    #[test]
    fn test_input_is_throttled_per_field() {
        let t0 = Instant::now();
        let mut binder = binder();

        assert!(binder.on_input(FieldId::WritingEditor, "H", t0).is_some());
        assert!(binder
            .on_input(FieldId::WritingEditor, "He", t0 + Duration::from_millis(100))
            .is_none());
        // Another field has its own window.
        assert!(binder
            .on_input(FieldId::ChapterTitle, "T", t0 + Duration::from_millis(100))
            .is_some());

        assert!(binder.poll(t0 + Duration::from_millis(400)).is_empty());
        assert_eq!(
            binder.poll(t0 + Duration::from_millis(500)),
            vec![ThrottledInput {
                field: FieldId::WritingEditor,
                len: 2
            }]
        );
    }

    #[test]
    fn test_blur_and_focus_rules() {
        let binder = binder();
        assert!(binder.should_save_on_blur(None));
        assert!(!binder.should_save_on_blur(Some(Duration::from_millis(1000))));
        assert!(binder.should_save_on_blur(Some(Duration::from_millis(1001))));

        assert!(!InputBinder::should_reset_on_focus("   \n"));
        assert!(InputBinder::should_reset_on_focus(" draft "));
    }
}
