use leptos::html::Form;
use leptos::prelude::*;
use std::rc::Rc;

use super::binding::bind_form;
use crate::state::FormStateConfig;

/// Binds the `<form>` behind `form_ref` once it is mounted.
///
/// ```rust,ignore
/// let form_ref = NodeRef::<Form>::new();
/// use_form_state(form_ref, FormStateConfig::new(FormStateOptions::default()));
///
/// view! {
///     <form name="profile" node_ref=form_ref>
///         <input name="email" />
///         <button class="fs-trigger--save">"Save"</button>
///     </form>
/// }
/// ```
pub fn use_form_state(form_ref: NodeRef<Form>, config: FormStateConfig) {
    let config = Rc::new(config);
    Effect::new(move |bound: Option<bool>| {
        if bound == Some(true) {
            return true;
        }
        let Some(form) = form_ref.get() else {
            return false;
        };
        if let Err(err) = bind_form(form, Rc::clone(&config)) {
            log::warn!("form_state: form not bound: {}", err);
        }
        true
    });
}
