//! Wires controllers to live `<form>` elements and their trigger buttons.
//!
//! # Usage
//!
//! ```rust,ignore
//! use form_state::system::binding::bind_forms;
//! use form_state::state::{FormStateConfig, FormStateOptions};
//!
//! let config = FormStateConfig::new(FormStateOptions::default().with_key_prefix("app_"))
//!     .on_save_complete(|_, data| log::info!("saved {:?}", data))
//!     .into_shared();
//! bind_forms("form.persist", config)?;
//! ```
//!
//! In the HTML, triggers live inside the form:
//! ```html
//! <form name="profile" class="persist" data-fs-group="signup">
//!     <input name="email">
//!     <button class="fs-trigger--save">Save</button>
//!     <button class="fs-trigger--skip">Skip</button>
//!     <button class="fs-trigger--clear">Forget</button>
//! </form>
//! ```

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlFormElement};

use crate::shared::confirm::WindowConfirm;
use crate::shared::dom_form::DomForm;
use crate::shared::js_error_message;
use crate::shared::storage::{KeyValueStore, LocalStorage};
use crate::state::{Action, FormStateConfig, FormStateController, FormStateError};

/// Controller over a live form and `localStorage`
pub type DomController = FormStateController<DomForm, LocalStorage>;

/// Binds one form: restores stored data, fires `initComplete`, then attaches
/// its trigger listeners. A form that fails to initialize gets no listeners.
pub fn bind_form(
    form: HtmlFormElement,
    config: Rc<FormStateConfig>,
) -> Result<Rc<DomController>, FormStateError> {
    bind_form_in(form, LocalStorage::open()?, config)
}

fn bind_form_in<S: KeyValueStore + 'static>(
    form: HtmlFormElement,
    store: S,
    config: Rc<FormStateConfig>,
) -> Result<Rc<FormStateController<DomForm, S>>, FormStateError> {
    let controller = Rc::new(
        FormStateController::new(DomForm::new(form), store, config)?
            .with_confirmation(WindowConfirm),
    );
    controller.initialize()?;
    attach_triggers(&controller);
    Ok(controller)
}

/// Binds every form matching `selector`, each independently: a form that
/// fails to bind is logged and skipped.
pub fn bind_forms(
    selector: &str,
    config: Rc<FormStateConfig>,
) -> Result<Vec<Rc<DomController>>, FormStateError> {
    bind_each(selector, |_| Rc::clone(&config))
}

/// Like [`bind_forms`], building a config per form
pub(crate) fn bind_each(
    selector: &str,
    config_for: impl Fn(&HtmlFormElement) -> Rc<FormStateConfig>,
) -> Result<Vec<Rc<DomController>>, FormStateError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| FormStateError::Dom("no document".to_string()))?;
    let nodes = document
        .query_selector_all(selector)
        .map_err(|err| FormStateError::Dom(js_error_message(&err)))?;

    let mut bound = Vec::new();
    for i in 0..nodes.length() {
        let Some(form) = nodes
            .get(i)
            .and_then(|node| node.dyn_into::<HtmlFormElement>().ok())
        else {
            log::debug!("form_state: match #{} of `{}` is not a form", i, selector);
            continue;
        };
        let config = config_for(&form);
        match bind_form(form, config) {
            Ok(controller) => bound.push(controller),
            Err(err) => {
                log::warn!("form_state: form #{} of `{}` not bound: {}", i, selector, err)
            }
        }
    }
    log::info!("form_state: bound {} form(s) for `{}`", bound.len(), selector);
    Ok(bound)
}

fn attach_triggers<S: KeyValueStore + 'static>(controller: &Rc<FormStateController<DomForm, S>>) {
    let form = controller.form().element();
    for action in Action::ALL {
        let selector = controller.config().options.triggers.selector(action);
        if selector.is_empty() {
            continue;
        }
        let triggers = match form.query_selector_all(selector) {
            Ok(triggers) => triggers,
            Err(err) => {
                log::warn!(
                    "form_state: invalid {} trigger selector `{}`: {}",
                    action,
                    selector,
                    js_error_message(&err)
                );
                continue;
            }
        };

        for i in 0..triggers.length() {
            let Some(trigger) = triggers.get(i) else {
                continue;
            };
            let controller = Rc::clone(controller);
            let on_click = Closure::wrap(Box::new(move |e: Event| {
                // A submit button must not submit
                e.prevent_default();
                if let Err(err) = controller.dispatch(action) {
                    log::error!("form_state: {} failed: {}", action, err);
                }
            }) as Box<dyn FnMut(Event)>);

            let _ = trigger
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            // Listeners live as long as the page
            on_click.forget();
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::shared::storage::StorageError;
    use crate::state::FormStateOptions;
    use std::cell::Cell;
    use wasm_bindgen_test::*;
    use web_sys::HtmlElement;

    wasm_bindgen_test_configure!(run_in_browser);

    /// Store whose reads always fail; counts attempted writes
    #[derive(Default)]
    struct UnreadableStore {
        writes: Cell<usize>,
    }

    impl KeyValueStore for UnreadableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("locked".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[wasm_bindgen_test]
    fn test_failed_initialize_attaches_no_triggers() {
        let document = web_sys::window().unwrap().document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_inner_html(
            r#"<form name="locked"><input name="a" value="1">
            <button type="button" class="fs-trigger--save">Save</button></form>"#,
        );
        document.body().unwrap().append_child(&container).unwrap();
        let form: HtmlFormElement = container
            .query_selector("form")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        let store = Rc::new(UnreadableStore::default());
        let config = Rc::new(FormStateConfig::new(FormStateOptions::default()));

        let result = bind_form_in(form.clone(), Rc::clone(&store), config);
        assert!(matches!(result, Err(FormStateError::Storage(_))));

        let button: HtmlElement = form
            .query_selector(".fs-trigger--save")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        button.click();
        assert_eq!(store.writes.get(), 0);
    }
}
