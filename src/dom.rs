//! Browser bindings: status rendering and DOM event forwarding.
//!
//! DOM listeners only translate browser events into [`RawEvent`]s and hand
//! them to the application, which routes them through its own scoped
//! listener registry.

use std::cell::RefCell;
use std::rc::Rc;

use jadescroll_ui::{Attached, ListenerAttacher};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AbortController, AddEventListenerOptions, Document, Event, EventTarget, HtmlElement,
    HtmlInputElement, HtmlTextAreaElement,
};
use web_time::Instant;

use crate::app::JadeScrollApp;
use crate::constants::{
    CHAPTER_UPDATED_EVENT, CHARACTER_UPDATED_EVENT, REQUIRED_ELEMENT_IDS,
    SAVE_STATUS_CONTAINER_CLASS, SAVE_STATUS_TEXT_ID, STATUS_INDICATOR_CLASS,
};
use crate::message::{FieldId, RawEvent};
use crate::save::{ConnectionState, StatusDisplay, StatusView, StatusViewError};

/// Renders save and connection status into the page.
pub struct DomStatusView {
    document: Document,
}

impl DomStatusView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn container(&self) -> Option<HtmlElement> {
        self.document
            .query_selector(&format!(".{}", SAVE_STATUS_CONTAINER_CLASS))
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

impl StatusView for DomStatusView {
    fn render_status(&mut self, display: &StatusDisplay) -> Result<(), StatusViewError> {
        let text = self
            .document
            .get_element_by_id(SAVE_STATUS_TEXT_ID)
            .ok_or_else(|| StatusViewError::missing(SAVE_STATUS_TEXT_ID))?;
        let container = self
            .container()
            .ok_or_else(|| StatusViewError::missing(SAVE_STATUS_CONTAINER_CLASS))?;

        text.set_inner_html(&format!(
            "<span class=\"status-dot\">{}</span>{}",
            display.dot, display.label
        ));

        let style = container.style();
        let animation = if display.pulse {
            "pulse 1s ease-in-out infinite"
        } else {
            ""
        };
        for (property, value) in [
            ("background", display.style.background),
            ("border-color", display.style.border),
            ("color", display.style.color),
            ("animation", animation),
        ] {
            if let Err(e) = style.set_property(property, value) {
                log::debug!("Failed to set {}: {:?}", property, e);
            }
        }
        Ok(())
    }

    fn render_connection(&mut self, connection: ConnectionState) -> Result<(), StatusViewError> {
        let indicator = self
            .document
            .query_selector(&format!(".{}", STATUS_INDICATOR_CLASS))
            .ok()
            .flatten()
            .ok_or_else(|| StatusViewError::missing(STATUS_INDICATOR_CLASS))?;
        let label = indicator
            .query_selector("span")
            .ok()
            .flatten()
            .ok_or_else(|| StatusViewError::missing(format!("{} span", STATUS_INDICATOR_CLASS)))?;

        let class = match connection {
            ConnectionState::Online => "online",
            ConnectionState::Offline => "offline",
        };
        indicator.set_class_name(&format!("{} {}", STATUS_INDICATOR_CLASS, class));
        label.set_text_content(Some(connection.label()));
        Ok(())
    }

    fn missing_targets(&self) -> Vec<String> {
        REQUIRED_ELEMENT_IDS
            .iter()
            .filter(|id| self.document.get_element_by_id(id).is_none())
            .map(|id| id.to_string())
            .collect()
    }
}

type Handler = Closure<dyn FnMut(Event)>;

/// DOM listeners forwarding page events to the application.
///
/// Listeners are registered with an `AbortController` signal so a repeated
/// [`attach`](Self::attach) removes the previous set. If the controller
/// cannot be created or a scoped registration fails, the listener is
/// attached without one and stays for the page's lifetime; later attaches
/// skip it.
#[derive(Default)]
pub struct DomBindings {
    controller: Option<AbortController>,
    handlers: Vec<Handler>,
    attacher: ListenerAttacher,
}

impl DomBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach field and custom-event listeners, replacing any earlier set.
    pub fn attach(&mut self, document: &Document, app: &Rc<RefCell<JadeScrollApp>>) {
        if let Some(previous) = self.controller.take() {
            previous.abort();
        }
        self.handlers.clear();

        let controller = match AbortController::new() {
            Ok(controller) => Some(controller),
            Err(e) => {
                log::warn!("⚠️ AbortController unavailable ({:?}), listeners are permanent", e);
                None
            }
        };

        for &field in FieldId::all() {
            let Some(element) = document.get_element_by_id(field.element_id()) else {
                log::warn!("⚠️ Element not found: {}", field.element_id());
                continue;
            };
            for kind in ["input", "blur", "focus"] {
                let handler = forwarder(app, move |event| {
                    let value = event.target().and_then(|t| field_value(&t));
                    match (kind, value) {
                        ("input", Some(value)) => Some(RawEvent::Input { field, value }),
                        ("blur", _) => Some(RawEvent::Blur { field }),
                        ("focus", value) => Some(RawEvent::Focus {
                            field,
                            value: value.unwrap_or_default(),
                        }),
                        _ => None,
                    }
                });
                self.listen(&element, field.element_id(), kind, handler, controller.as_ref());
            }
        }

        for name in [CHARACTER_UPDATED_EVENT, CHAPTER_UPDATED_EVENT] {
            let handler = forwarder(app, move |_| {
                Some(RawEvent::Custom {
                    name: name.to_string(),
                })
            });
            self.listen(document, "document", name, handler, controller.as_ref());
        }

        self.controller = controller;
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        owner: &str,
        kind: &str,
        handler: Handler,
        controller: Option<&AbortController>,
    ) {
        let callback: &js_sys::Function = handler.as_ref().unchecked_ref();
        let scoped = controller.map(|controller| {
            move || {
                let options = AddEventListenerOptions::new();
                options.set_signal(&controller.signal());
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    kind, callback, &options,
                )
            }
        });
        let attached = self.attacher.attach(&format!("{}:{}", owner, kind), scoped, || {
            target.add_event_listener_with_callback(kind, callback)
        });

        match attached {
            Attached::Scoped => self.handlers.push(handler),
            Attached::Permanent => handler.forget(), // Leak the closure to keep it alive
            Attached::AlreadyPermanent | Attached::Failed => {}
        }
    }
}

/// Wrap `to_event` into a DOM handler that dispatches into the app.
fn forwarder<F>(app: &Rc<RefCell<JadeScrollApp>>, to_event: F) -> Handler
where
    F: Fn(&Event) -> Option<RawEvent> + 'static,
{
    let app = Rc::clone(app);
    Closure::wrap(Box::new(move |event: Event| {
        let Some(raw) = to_event(&event) else { return };
        match app.try_borrow_mut() {
            Ok(mut app) => app.dispatch(raw, Instant::now()),
            Err(_) => log::debug!("App busy, dropping {:?}", raw),
        }
    }) as Box<dyn FnMut(Event)>)
}

fn field_value(target: &EventTarget) -> Option<String> {
    if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        return Some(area.value());
    }
    target.dyn_ref::<HtmlInputElement>().map(|input| input.value())
}
