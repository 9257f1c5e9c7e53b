//! Page-lifetime state and the callbacks that feed it.
//!
//! All state lives in one thread-local cell. Every host callback (mutation
//! batch, timer, runtime message, legend click) borrows it for the length of a
//! synchronous handler, so handlers never interleave.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use chroma_core::{ContentScript, MutationBatch, ReconcileReport, ScriptConfig, Settings};
use chroma_ui::{DomDocument, DomLegendView, DomPost};
use gloo_timers::callback::Timeout;
use js_sys::Array;
use log::{debug, error, info, warn};
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, DocumentReadyState, MutationObserver, MutationObserverInit, MutationRecord};

use crate::host::{to_js, Host};
use crate::logging;

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

struct Runtime {
    script: ContentScript<DomLegendView>,
    document: DomDocument,
    host: Host,
    config: Rc<ScriptConfig>,
    /// Pending storage reload; replacing it cancels the previous one.
    reload: Option<Timeout>,
    _observer: MutationObserver,
    _on_mutation: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl Runtime {
    fn apply(&mut self, settings: Settings) -> ReconcileReport {
        self.script
            .apply_settings(settings, &self.document, Utc::now())
    }

    fn handle_message(&mut self, message: JsValue) -> Option<JsValue> {
        let message = match from_value::<serde_json::Value>(message) {
            Ok(message) => message,
            Err(err) => {
                debug!("ignoring unreadable runtime message: {err}");
                return None;
            }
        };

        let ack = self
            .script
            .handle_message(&message, &self.document, Utc::now())?;
        match to_js(&ack) {
            Ok(reply) => Some(reply),
            Err(err) => {
                warn!("cannot encode acknowledgment: {err:?}");
                None
            }
        }
    }

    fn on_mutations(&mut self, records: &Array) {
        let batch: MutationBatch<DomPost> = records
            .iter()
            .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
            .flat_map(|record| {
                let added = record.added_nodes();
                (0..added.length())
                    .filter_map(|index| added.item(index))
                    .collect::<Vec<_>>()
            })
            .flat_map(|node| self.document.posts_in(&node))
            .collect();

        if batch.is_empty() {
            return;
        }

        let outcome = self.script.on_batch(&batch, Utc::now());
        if outcome.schedule_rescan {
            // Bounded by the watcher: a new one is only armed after this fires.
            Timeout::new(self.config.rescan_delay_ms, || {
                with_runtime(Runtime::rescan);
            })
            .forget();
        }
    }

    fn rescan(&mut self) {
        let marked = self.script.on_rescan(&self.document, Utc::now());
        if marked > 0 {
            debug!("fallback rescan marked {marked} posts");
        }
    }

    fn schedule_reload(&mut self) {
        let host = self.host.clone();
        self.reload = Some(Timeout::new(self.config.settings_debounce_ms, move || {
            load_stored_settings(&host);
        }));
    }
}

/// Runs `f` against the runtime, or does nothing before init or on re-entry.
fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| match cell.try_borrow_mut() {
        Ok(mut runtime) => runtime.as_mut().map(f),
        Err(_) => {
            warn!("runtime busy, dropping re-entrant callback");
            None
        }
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    let document = page_document()?;
    if document.ready_state() == DocumentReadyState::Loading {
        let ready = Closure::once_into_js(|| {
            if let Err(err) = init() {
                error!("initialization failed: {err:?}");
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
        Ok(())
    } else {
        init()
    }
}

/// Replaces the settings from the extension shell and returns the reconciliation report.
#[wasm_bindgen(js_name = applySettings)]
pub fn apply_settings(settings: JsValue) -> Result<JsValue, JsValue> {
    let settings: Settings = from_value(settings)
        .map_err(|err| JsValue::from_str(&format!("invalid settings: {err}")))?;

    let report = with_runtime(|runtime| runtime.apply(settings))
        .ok_or_else(|| JsValue::from_str("content script is not running"))?;
    to_js(&report)
}

fn init() -> Result<(), JsValue> {
    let document = page_document()?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let config = Rc::new(ScriptConfig::default());
    let host = Host::detect();

    let view = DomLegendView::new(
        document.clone(),
        Rc::clone(&config),
        Rc::new(|| {
            with_runtime(|runtime| runtime.script.toggle_legend());
        }),
    );
    let dom = DomDocument::new(document, Rc::clone(&config));
    let mut script = ContentScript::new(view);
    script.apply_settings(Settings::default(), &dom, Utc::now());

    let on_mutation = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        |records: Array, _observer: MutationObserver| {
            with_runtime(|runtime| runtime.on_mutations(&records));
        },
    );
    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&body, &options)?;

    let startup_rescan_delay_ms = config.startup_rescan_delay_ms;
    RUNTIME.with(|cell| {
        *cell.borrow_mut() = Some(Runtime {
            script,
            document: dom,
            host: host.clone(),
            config,
            reload: None,
            _observer: observer,
            _on_mutation: on_mutation,
        });
    });

    if !host.on_message(|message| with_runtime(|runtime| runtime.handle_message(message)).flatten()) {
        warn!("runtime messaging unavailable, live settings updates disabled");
    }
    host.on_storage_changed(|| {
        with_runtime(Runtime::schedule_reload);
    });
    load_stored_settings(&host);

    Timeout::new(startup_rescan_delay_ms, || {
        with_runtime(Runtime::rescan);
    })
    .forget();

    info!("content script initialized");
    Ok(())
}

/// Reads the storage bag, migrates it when needed, and re-applies.
fn load_stored_settings(host: &Host) {
    let requested = host.load_settings(|items| {
        let bag = from_value::<serde_json::Value>(items).unwrap_or_else(|err| {
            warn!("unreadable settings bag: {err}");
            serde_json::Value::Null
        });
        let loaded = Settings::from_stored(&bag);

        with_runtime(|runtime| {
            if loaded.migrated && bag.is_object() {
                info!("migrating stored settings to colorMode");
                runtime.host.save_settings(&loaded.settings);
            }
            runtime.apply(loaded.settings);
        });
    });

    if !requested {
        warn!("extension storage unavailable, using default settings");
    }
}

fn page_document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document to annotate"))
}
