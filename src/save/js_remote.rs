//! Remote backend bridged to a page-provided JavaScript module.
//!
//! The page may expose `window.FirebaseModule` with four promise-returning
//! functions. When the global is missing the application falls back to
//! [`InactiveRemote`](super::InactiveRemote).

use js_sys::{Function, JSON, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::backend::{BackendFuture, RemoteBackend, ready};
use super::BackendError;
use crate::model::AppState;

const MODULE_GLOBAL: &str = "FirebaseModule";

/// Remote backend calling into `window.FirebaseModule`.
#[derive(Debug, Clone)]
pub struct JsRemote {
    module: JsValue,
}

impl JsRemote {
    /// Look the module up on `window`. `None` when the page did not provide it.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let module = Reflect::get(&window, &JsValue::from_str(MODULE_GLOBAL)).ok()?;
        if module.is_undefined() || module.is_null() {
            log::info!("🔌 No {} on the page, remote saving disabled", MODULE_GLOBAL);
            return None;
        }
        log::info!("🔌 Found {} on the page", MODULE_GLOBAL);
        Some(Self { module })
    }

    /// Call `name(args..)` on the module and turn the result into a promise.
    fn call(&self, name: &str, args: &[JsValue]) -> Result<Promise, BackendError> {
        let function = Reflect::get(&self.module, &JsValue::from_str(name))
            .map_err(|e| BackendError::Transport(describe(&e)))?
            .dyn_into::<Function>()
            .map_err(|_| BackendError::Transport(format!("{} is not a function", name)))?;

        let result = match args {
            [] => function.call0(&self.module),
            [arg] => function.call1(&self.module, arg),
            _ => return Err(BackendError::Transport(format!("{}: too many arguments", name))),
        }
        .map_err(|e| BackendError::Transport(describe(&e)))?;

        // Plain values are accepted as already-resolved promises.
        Ok(Promise::resolve(&result))
    }

    /// Await a boolean-ish promise; rejections and errors read as `false`.
    fn call_flag(&self, name: &'static str) -> BackendFuture<bool> {
        let promise = match self.call(name, &[]) {
            Ok(promise) => promise,
            Err(e) => {
                log::warn!("{}: {}", name, e);
                return ready(false);
            }
        };
        Box::pin(async move {
            match JsFuture::from(promise).await {
                Ok(value) => value.is_truthy(),
                Err(e) => {
                    log::warn!("{} rejected: {}", name, describe(&e));
                    false
                }
            }
        })
    }
}

impl RemoteBackend for JsRemote {
    fn name(&self) -> &str {
        MODULE_GLOBAL
    }

    fn initialize(&mut self) -> BackendFuture<bool> {
        self.call_flag("initializeFirebase")
    }

    fn check_connection(&self) -> BackendFuture<bool> {
        self.call_flag("checkFirebaseConnection")
    }

    fn check_health(&self) -> BackendFuture<bool> {
        self.call_flag("checkAPIHealth")
    }

    fn save(&self, state: &AppState) -> BackendFuture<Result<bool, BackendError>> {
        let payload = state
            .to_json()
            .map_err(|e| BackendError::Rejected(e.to_string()))
            .and_then(|json| {
                JSON::parse(&json).map_err(|e| BackendError::Rejected(describe(&e)))
            });
        let promise = match payload.and_then(|value| self.call("saveToFirebase", &[value])) {
            Ok(promise) => promise,
            Err(e) => return ready(Err(e)),
        };

        Box::pin(async move {
            JsFuture::from(promise)
                .await
                .map(|value| value.is_truthy())
                .map_err(|e| BackendError::Transport(describe(&e)))
        })
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
