//! Optional extension APIs (`chrome.storage`, `chrome.runtime`).
//!
//! Every capability is looked up at start and may be missing, e.g. when the
//! bundle is loaded into a plain page for testing.

use chroma_core::Settings;
use js_sys::{Function, Reflect};
use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// `chrome.storage.StorageArea`
    #[derive(Clone)]
    pub type StorageArea;

    #[wasm_bindgen(method, catch)]
    fn get(this: &StorageArea, keys: &JsValue, callback: &Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn set(this: &StorageArea, items: &JsValue) -> Result<(), JsValue>;

    /// `chrome.events.Event`
    #[derive(Clone)]
    pub type ChromeEvent;

    #[wasm_bindgen(method, catch, js_name = addListener)]
    fn add_listener(this: &ChromeEvent, callback: &Function) -> Result<(), JsValue>;
}

const SYNC_AREA: &str = "sync";

#[derive(Clone)]
pub struct Host {
    storage: Option<StorageArea>,
    storage_changed: Option<ChromeEvent>,
    runtime_message: Option<ChromeEvent>,
}

impl Host {
    pub fn detect() -> Self {
        let global: JsValue = js_sys::global().into();
        let chrome = lookup(&global, &["chrome"]);
        let capability = |path: &[&str]| chrome.as_ref().and_then(|chrome| lookup(chrome, path));

        Self {
            storage: capability(&["storage", "sync"]).map(JsCast::unchecked_into),
            storage_changed: capability(&["storage", "onChanged"]).map(JsCast::unchecked_into),
            runtime_message: capability(&["runtime", "onMessage"]).map(JsCast::unchecked_into),
        }
    }

    /// Reads the whole settings bag. Returns false when storage is unavailable,
    /// in which case `on_loaded` is never called.
    pub fn load_settings<F>(&self, on_loaded: F) -> bool
    where
        F: FnOnce(JsValue) + 'static,
    {
        let Some(storage) = &self.storage else {
            return false;
        };

        let callback = Closure::once_into_js(on_loaded);
        match storage.get(&JsValue::NULL, callback.unchecked_ref()) {
            Ok(()) => true,
            Err(err) => {
                warn!("storage read failed: {err:?}");
                false
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) {
        let Some(storage) = &self.storage else {
            return;
        };

        let result = to_js(settings).and_then(|items| storage.set(&items));
        if let Err(err) = result {
            warn!("storage write failed: {err:?}");
        }
    }

    /// Registers `handler` for runtime messages. A `Some` return is sent back
    /// through `sendResponse`.
    pub fn on_message<F>(&self, mut handler: F) -> bool
    where
        F: FnMut(JsValue) -> Option<JsValue> + 'static,
    {
        let Some(event) = &self.runtime_message else {
            return false;
        };

        let listener = Closure::<dyn FnMut(JsValue, JsValue, Function)>::new(
            move |message: JsValue, _sender: JsValue, send_response: Function| {
                if let Some(reply) = handler(message) {
                    if let Err(err) = send_response.call1(&JsValue::NULL, &reply) {
                        warn!("cannot acknowledge message: {err:?}");
                    }
                }
            },
        );
        register(event, listener.into_js_value())
    }

    /// Registers `handler` for changes of the sync storage area.
    pub fn on_storage_changed<F>(&self, mut handler: F) -> bool
    where
        F: FnMut() + 'static,
    {
        let Some(event) = &self.storage_changed else {
            return false;
        };

        let listener = Closure::<dyn FnMut(JsValue, JsValue)>::new(
            move |_changes: JsValue, area: JsValue| {
                if area.as_string().as_deref() == Some(SYNC_AREA) {
                    handler();
                }
            },
        );
        register(event, listener.into_js_value())
    }
}

/// Plain JS object (not `Map`) for anything serializable.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("cannot serialize: {err}")))
}

fn register(event: &ChromeEvent, listener: JsValue) -> bool {
    match event.add_listener(listener.unchecked_ref()) {
        Ok(()) => true,
        Err(err) => {
            warn!("cannot register extension listener: {err:?}");
            false
        }
    }
}

fn lookup(root: &JsValue, path: &[&str]) -> Option<JsValue> {
    let mut current = root.clone();
    for key in path {
        current = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    Some(current)
}
