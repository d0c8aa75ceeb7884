//! JavaScript entry points.
//!
//! ```js
//! import init, { initLogging, formState } from "./pkg/form_state.js";
//!
//! await init();
//! initLogging("debug");
//! formState("form.persist", {
//!     keyPrefix: "app_",
//!     confirmDeleteText: "Forget what you typed?",
//!     saveComplete(form, data) { console.log(form.name, data); },
//! });
//! ```

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlFormElement;

use contracts::shared::form_state::FormSnapshot;

use super::binding::bind_each;
use crate::shared::form_handle::FormHandle;
use crate::state::{Callbacks, FormStateConfig, FormStateOptions, LifecycleEvent};

const EVENTS: [LifecycleEvent; 4] = [
    LifecycleEvent::InitComplete,
    LifecycleEvent::SaveComplete,
    LifecycleEvent::SkipComplete,
    LifecycleEvent::ClearComplete,
];

/// Installs console logging at `level` ("error" .. "trace", default "info")
/// and the panic hook
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    let level = level
        .as_deref()
        .and_then(|level| level.parse::<log::Level>().ok())
        .unwrap_or(log::Level::Info);
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();
}

/// Binds every form matching `selector`. `options` takes the data options
/// (`keyPrefix`, `groupDataAttrib`, `triggers`, `confirmDeleteText`) and the
/// callbacks (`initComplete`, `saveComplete`, `skipComplete`,
/// `clearComplete`), each called as `callback.call(form, form, data)`.
///
/// Returns how many forms were bound.
#[wasm_bindgen(js_name = formState)]
pub fn form_state(selector: &str, options: JsValue) -> Result<u32, JsValue> {
    let data_options = if options.is_undefined() || options.is_null() {
        FormStateOptions::default()
    } else {
        serde_wasm_bindgen::from_value::<FormStateOptions>(options.clone())?
    };
    let handlers = read_handlers(&options);

    let bound = bind_each(selector, |form| {
        Rc::new(FormStateConfig {
            options: data_options.clone(),
            callbacks: callbacks_for(form, &handlers),
        })
    })
    .map_err(|err| JsValue::from_str(&err.to_string()))?;

    Ok(bound.len() as u32)
}

fn read_handlers(options: &JsValue) -> Vec<(LifecycleEvent, js_sys::Function)> {
    if !options.is_object() {
        return Vec::new();
    }
    EVENTS
        .iter()
        .filter_map(|event| {
            js_sys::Reflect::get(options, &JsValue::from_str(event.as_str()))
                .ok()
                .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
                .map(|handler| (*event, handler))
        })
        .collect()
}

fn callbacks_for(
    form: &HtmlFormElement,
    handlers: &[(LifecycleEvent, js_sys::Function)],
) -> Callbacks {
    let mut callbacks = Callbacks::default();
    for (event, handler) in handlers {
        let event = *event;
        let handler = handler.clone();
        let form = form.clone();
        callbacks.set(
            event,
            Rc::new(move |_: &dyn FormHandle, data: Option<&FormSnapshot>| {
                let data = data
                    .and_then(|snapshot| serde_wasm_bindgen::to_value(snapshot).ok())
                    .unwrap_or(JsValue::NULL);
                if let Err(err) = handler.call2(&form, &form, &data) {
                    log::error!("form_state: {} callback threw: {:?}", event.as_str(), err);
                }
            }),
        );
    }
    callbacks
}
