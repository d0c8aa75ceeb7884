//! In-memory [`FormHandle`] with browser-like control semantics.
//!
//! Radio buttons sharing a name are mutually exclusive and a single select
//! keeps at most one option selected, as in a live document.
//!
//! ```
//! use form_state::shared::memory_form::MemoryForm;
//!
//! let form = MemoryForm::named("profile")
//!     .text("email", "a@b.com")
//!     .checkbox("opt", "x", true)
//!     .checkbox("opt", "y", false);
//! assert_eq!(form.checked_values("opt"), vec!["x"]);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::form_handle::{Control, ControlKind, FormHandle, SelectOption};

#[derive(Debug, Default)]
pub struct MemoryForm {
    name: Option<String>,
    data: BTreeMap<String, String>,
    controls: RefCell<Vec<Control>>,
}

impl MemoryForm {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A form without a `name` attribute
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Sets a `data-<key>` attribute on the form
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Appends a control of any kind
    pub fn with_control(self, kind: ControlKind, name: &str, value: &str) -> Self {
        self.push(kind, name, value, false, Vec::new())
    }

    pub fn text(self, name: &str, value: &str) -> Self {
        self.with_control(ControlKind::Text, name, value)
    }

    pub fn password(self, name: &str, value: &str) -> Self {
        self.with_control(ControlKind::Password, name, value)
    }

    pub fn textarea(self, name: &str, value: &str) -> Self {
        self.with_control(ControlKind::TextArea, name, value)
    }

    pub fn hidden(self, name: &str, value: &str) -> Self {
        self.with_control(ControlKind::Hidden, name, value)
    }

    pub fn submit(self, name: &str, value: &str) -> Self {
        self.with_control(ControlKind::Button, name, value)
    }

    pub fn checkbox(self, name: &str, value: &str, checked: bool) -> Self {
        self.push(ControlKind::Checkbox, name, value, checked, Vec::new())
    }

    pub fn radio(self, name: &str, value: &str, checked: bool) -> Self {
        self.push(ControlKind::Radio, name, value, checked, Vec::new())
    }

    pub fn select(self, name: &str, options: &[&str], selected: Option<&str>) -> Self {
        let options = build_options(options, |value| selected == Some(value));
        self.push(ControlKind::SelectOne, name, "", false, options)
    }

    pub fn select_multiple(self, name: &str, options: &[&str], selected: &[&str]) -> Self {
        let options = build_options(options, |value| selected.contains(&value));
        self.push(ControlKind::SelectMultiple, name, "", false, options)
    }

    /// Marks the most recently added control as disabled
    pub fn disabled(self) -> Self {
        if let Some(last) = self.controls.borrow_mut().last_mut() {
            last.disabled = true;
        }
        self
    }

    /// Value of the first control named `name`
    pub fn value_of(&self, name: &str) -> Option<String> {
        self.controls
            .borrow()
            .iter()
            .find(|control| control.name == name)
            .map(|control| control.value.clone())
    }

    /// Values of the checked checkables named `name`
    pub fn checked_values(&self, name: &str) -> Vec<String> {
        self.controls
            .borrow()
            .iter()
            .filter(|control| control.name == name && control.checked)
            .map(|control| control.value.clone())
            .collect()
    }

    /// Selected option values of the first select named `name`
    pub fn selected_values(&self, name: &str) -> Vec<String> {
        self.controls
            .borrow()
            .iter()
            .find(|control| control.name == name)
            .map(|control| control.selected_values().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn push(
        self,
        kind: ControlKind,
        name: &str,
        value: &str,
        checked: bool,
        options: Vec<SelectOption>,
    ) -> Self {
        {
            let mut controls = self.controls.borrow_mut();
            let index = controls.len();
            let mut control = Control {
                index,
                name: name.to_string(),
                kind,
                value: value.to_string(),
                checked: false,
                disabled: false,
                options,
            };
            if control.kind.is_select() {
                sync_select_value(&mut control);
            }
            controls.push(control);
        }
        if checked {
            let index = self.controls.borrow().len() - 1;
            self.set_checked(index, true);
        }
        self
    }
}

fn build_options(values: &[&str], is_selected: impl Fn(&str) -> bool) -> Vec<SelectOption> {
    values
        .iter()
        .map(|value| SelectOption {
            value: value.to_string(),
            selected: is_selected(value),
        })
        .collect()
}

/// A select reports the value of its first selected option
fn sync_select_value(control: &mut Control) {
    let value = control
        .selected_values()
        .next()
        .map(str::to_string)
        .unwrap_or_default();
    control.value = value;
}

impl FormHandle for MemoryForm {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn data_attribute(&self, key: &str) -> Option<String> {
        self.data.get(key).cloned()
    }

    fn controls(&self) -> Vec<Control> {
        self.controls.borrow().clone()
    }

    fn set_value(&self, index: usize, value: &str) {
        let mut controls = self.controls.borrow_mut();
        let Some(control) = controls.get_mut(index) else {
            return;
        };
        match control.kind {
            ControlKind::SelectOne => {
                let mut matched = false;
                for option in control.options.iter_mut() {
                    option.selected = !matched && option.value == value;
                    matched |= option.selected;
                }
                sync_select_value(control);
            }
            ControlKind::SelectMultiple => {
                for option in control.options.iter_mut() {
                    option.selected = option.value == value;
                }
                sync_select_value(control);
            }
            _ => control.value = value.to_string(),
        }
    }

    fn set_checked(&self, index: usize, checked: bool) {
        let mut controls = self.controls.borrow_mut();
        let Some(control) = controls.get(index) else {
            return;
        };
        if !control.kind.is_checkable() {
            return;
        }
        if checked && control.kind == ControlKind::Radio {
            let group = control.name.clone();
            for other in controls
                .iter_mut()
                .filter(|other| other.kind == ControlKind::Radio && other.name == group)
            {
                other.checked = false;
            }
        }
        controls[index].checked = checked;
    }

    fn set_selected(&self, index: usize, values: &[&str]) {
        let mut controls = self.controls.borrow_mut();
        let Some(control) = controls.get_mut(index) else {
            return;
        };
        let single = control.kind == ControlKind::SelectOne;
        let mut matched = false;
        for option in control.options.iter_mut() {
            let wanted = values.contains(&option.value.as_str());
            option.selected = wanted && !(single && matched);
            matched |= option.selected;
        }
        sync_select_value(control);
    }
}
