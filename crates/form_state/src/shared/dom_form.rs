use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, HtmlTextAreaElement,
};

use super::form_handle::{Control, ControlKind, FormHandle, SelectOption};

/// [`FormHandle`] over a live `<form>` element.
///
/// Controls come from `form.elements` in document order; their index in that
/// collection is the control index. `<fieldset>`, `<output>` and `<object>`
/// entries keep their slot but are not reported.
#[derive(Clone, Debug)]
pub struct DomForm {
    form: HtmlFormElement,
}

impl DomForm {
    pub fn new(form: HtmlFormElement) -> Self {
        Self { form }
    }

    pub fn element(&self) -> &HtmlFormElement {
        &self.form
    }

    fn control_at(&self, index: usize) -> Option<DomControl> {
        let index = u32::try_from(index).ok()?;
        self.form.elements().item(index).and_then(DomControl::from_element)
    }
}

enum DomControl {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
    Button(HtmlButtonElement),
}

impl DomControl {
    fn from_element(element: Element) -> Option<Self> {
        let element = match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(DomControl::Input(input)),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(textarea) => return Some(DomControl::TextArea(textarea)),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlSelectElement>() {
            Ok(select) => return Some(DomControl::Select(select)),
            Err(element) => element,
        };
        element.dyn_into::<HtmlButtonElement>().ok().map(DomControl::Button)
    }

    fn describe(&self, index: usize) -> Control {
        let mut control = Control {
            index,
            name: String::new(),
            kind: ControlKind::Other(String::new()),
            value: String::new(),
            checked: false,
            disabled: false,
            options: Vec::new(),
        };
        match self {
            DomControl::Input(input) => {
                control.name = input.name();
                control.kind = ControlKind::from_type(&input.type_());
                control.value = input.value();
                control.checked = input.checked();
            }
            DomControl::TextArea(textarea) => {
                control.name = textarea.name();
                control.kind = ControlKind::TextArea;
                control.value = textarea.value();
            }
            DomControl::Select(select) => {
                control.name = select.name();
                control.kind = ControlKind::from_type(&select.type_());
                control.value = select.value();
                control.options = select_options(select)
                    .map(|option| SelectOption {
                        value: option.value(),
                        selected: option.selected(),
                    })
                    .collect();
            }
            DomControl::Button(button) => {
                control.name = button.name();
                control.kind = ControlKind::Button;
                control.value = button.value();
            }
        }
        // Covers controls inside a disabled `<fieldset>` too
        control.disabled = self.element().matches(":disabled").unwrap_or(false);
        control
    }

    fn element(&self) -> &Element {
        match self {
            DomControl::Input(input) => input.as_ref(),
            DomControl::TextArea(textarea) => textarea.as_ref(),
            DomControl::Select(select) => select.as_ref(),
            DomControl::Button(button) => button.as_ref(),
        }
    }
}

fn select_options(select: &HtmlSelectElement) -> impl Iterator<Item = HtmlOptionElement> + '_ {
    (0..select.length())
        .filter_map(move |i| select.item(i))
        .filter_map(|element| element.dyn_into::<HtmlOptionElement>().ok())
}

impl FormHandle for DomForm {
    fn name(&self) -> Option<String> {
        let name = self.form.name();
        (!name.is_empty()).then_some(name)
    }

    fn data_attribute(&self, key: &str) -> Option<String> {
        self.form.get_attribute(&format!("data-{}", key))
    }

    fn controls(&self) -> Vec<Control> {
        let elements = self.form.elements();
        (0..elements.length())
            .filter_map(|i| {
                let control = DomControl::from_element(elements.item(i)?)?;
                Some(control.describe(i as usize))
            })
            .collect()
    }

    fn set_value(&self, index: usize, value: &str) {
        match self.control_at(index) {
            Some(DomControl::Input(input)) => input.set_value(value),
            Some(DomControl::TextArea(textarea)) => textarea.set_value(value),
            Some(DomControl::Select(select)) => select.set_value(value),
            Some(DomControl::Button(button)) => button.set_value(value),
            None => {}
        }
    }

    fn set_checked(&self, index: usize, checked: bool) {
        if let Some(DomControl::Input(input)) = self.control_at(index) {
            input.set_checked(checked);
        }
    }

    fn set_selected(&self, index: usize, values: &[&str]) {
        let Some(DomControl::Select(select)) = self.control_at(index) else {
            return;
        };
        if values.is_empty() {
            select.set_selected_index(-1);
            return;
        }
        for option in select_options(&select) {
            option.set_selected(values.contains(&option.value().as_str()));
        }
    }
}
