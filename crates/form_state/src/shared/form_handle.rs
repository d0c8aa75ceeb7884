//! Narrow field-accessor interface the core works against.
//!
//! A [`FormHandle`] enumerates a form's controls as [`Control`] descriptors and
//! writes values back by control index. The core never sees the DOM itself.

/// Kind of a form control, derived from its `type`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlKind {
    /// Text-entry inputs: `text`, `email`, `search`, `tel`, `url`, `number`
    /// and the date/time family
    Text,
    Password,
    TextArea,
    Hidden,
    Checkbox,
    Radio,
    SelectOne,
    SelectMultiple,
    /// `submit`, `reset`, `button`, `image`
    Button,
    File,
    Other(String),
}

impl ControlKind {
    /// Maps a DOM `type` property (`input.type`, `"textarea"`, `"select-one"`, ...)
    pub fn from_type(type_name: &str) -> Self {
        match type_name.to_ascii_lowercase().as_str() {
            "text" | "email" | "search" | "tel" | "url" | "number" | "date"
            | "datetime-local" | "month" | "week" | "time" => ControlKind::Text,
            "password" => ControlKind::Password,
            "textarea" => ControlKind::TextArea,
            "hidden" => ControlKind::Hidden,
            "checkbox" => ControlKind::Checkbox,
            "radio" => ControlKind::Radio,
            "select-one" => ControlKind::SelectOne,
            "select-multiple" => ControlKind::SelectMultiple,
            "submit" | "reset" | "button" | "image" => ControlKind::Button,
            "file" => ControlKind::File,
            other => ControlKind::Other(other.to_string()),
        }
    }

    /// Checkbox and radio: state lives in `checked`, not in `value`
    pub fn is_checkable(&self) -> bool {
        matches!(self, ControlKind::Checkbox | ControlKind::Radio)
    }

    pub fn is_select(&self) -> bool {
        matches!(self, ControlKind::SelectOne | ControlKind::SelectMultiple)
    }

    /// Controls that hold several values under one name
    pub fn is_multi_valued(&self) -> bool {
        self.is_checkable() || *self == ControlKind::SelectMultiple
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

/// Point-in-time view of one control
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    /// Position in the form's control collection; stable for the lifetime of the form
    pub index: usize,
    pub name: String,
    pub kind: ControlKind,
    /// Current value. For checkables this is the submitted value, not the state.
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    /// Select options in document order; empty for every other kind
    pub options: Vec<SelectOption>,
}

impl Control {
    pub fn selected_values(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.value.as_str())
    }
}

/// Field accessor over one live form.
///
/// Setters take the [`Control::index`] reported by [`FormHandle::controls`].
/// Writes to an index that no longer exists are ignored.
pub trait FormHandle {
    /// The form's `name` attribute, if any
    fn name(&self) -> Option<String>;

    /// Value of the `data-<key>` attribute on the form element
    fn data_attribute(&self, key: &str) -> Option<String>;

    /// All controls in document order
    fn controls(&self) -> Vec<Control>;

    /// Assigns a value. On a single select this selects the matching option
    /// (or nothing when no option matches).
    fn set_value(&self, index: usize, value: &str);

    fn set_checked(&self, index: usize, checked: bool);

    /// Selects exactly the options whose value is listed; an empty list clears the selection
    fn set_selected(&self, index: usize, values: &[&str]);
}
