pub mod confirm;
pub mod dom_form;
pub mod form_handle;
pub mod memory_form;
pub mod storage;

use wasm_bindgen::{JsCast, JsValue};

/// Best-effort readable message out of a thrown JS value
pub(crate) fn js_error_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
