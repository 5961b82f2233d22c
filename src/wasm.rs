use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::app::JadeScrollApp;
use crate::config::AppConfig;
use crate::constants::TICK_INTERVAL_MS;
use crate::dom::{DomBindings, DomStatusView};
use crate::save::{BrowserStorage, InactiveRemote, JsRemote, LocalStore, MemoryStore, RemoteBackend};

thread_local! {
    /// DOM listeners live as long as the page
    static BINDINGS: RefCell<DomBindings> = RefCell::new(DomBindings::new());
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let local: Box<dyn LocalStore> = match BrowserStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            web_sys::console::log_1(&format!("{}, using memory storage", e).into());
            Box::new(MemoryStore::new())
        }
    };
    let config = AppConfig::load_from_store(local.as_ref()).unwrap_or_default();

    if console_log::init_with_level(config.preferences.log_level.to_level()).is_err() {
        web_sys::console::log_1(&"Logger already initialized".into());
    }
    log::info!("JadeScroll WASM starting...");

    let Some(window) = web_sys::window() else {
        log::error!("No window object available");
        return;
    };
    let Some(document) = window.document() else {
        log::error!("No document available");
        return;
    };

    let remote: Box<dyn RemoteBackend> = match JsRemote::detect() {
        Some(remote) => Box::new(remote),
        None => Box::new(InactiveRemote),
    };
    let app = Rc::new(RefCell::new(JadeScrollApp::new(
        config,
        remote,
        local,
        Box::new(DomStatusView::new(document.clone())),
        Instant::now(),
    )));

    BINDINGS.with(|bindings| bindings.borrow_mut().attach(&document, &app));
    start_ticking(&window, &app);

    wasm_bindgen_futures::spawn_local(initialize(app));
}

/// Ticks and page events skip the app while this borrow is held.
#[expect(
    clippy::await_holding_refcell_ref,
    reason = "other borrowers use try_borrow_mut and skip"
)]
async fn initialize(app: Rc<RefCell<JadeScrollApp>>) {
    let mut app = app.borrow_mut();
    app.initialize(Instant::now(), true).await;
}

fn start_ticking(window: &web_sys::Window, app: &Rc<RefCell<JadeScrollApp>>) {
    let app = Rc::clone(app);
    let tick = Closure::wrap(Box::new(move || {
        if let Ok(mut app) = app.try_borrow_mut() {
            app.tick(Instant::now());
        }
    }) as Box<dyn FnMut()>);

    if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        TICK_INTERVAL_MS as i32,
    ) {
        log::error!("❌ Could not start tick interval: {:?}", e);
    }
    tick.forget(); // Leak the closure to keep it alive
}
