//! Per-binding configuration.
//!
//! [`FormStateOptions`] holds the plain data options and deserializes with
//! defaults for every missing key, so a partial JSON or JS object acts as an
//! override on top of the defaults. [`FormStateConfig`] adds the lifecycle
//! callbacks and is shared read-only (`Rc`) by everything a binding creates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use contracts::shared::form_state::FormSnapshot;

use crate::shared::form_handle::FormHandle;

/// The three user-triggered actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Save,
    Skip,
    Clear,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Save, Action::Skip, Action::Clear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Save => "save",
            Action::Skip => "skip",
            Action::Clear => "clear",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selectors, scoped to the form, of the elements that trigger each action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSelectors {
    pub save: String,
    pub skip: String,
    pub clear: String,
}

impl Default for TriggerSelectors {
    fn default() -> Self {
        Self {
            save: ".fs-trigger--save".to_string(),
            skip: ".fs-trigger--skip".to_string(),
            clear: ".fs-trigger--clear".to_string(),
        }
    }
}

impl TriggerSelectors {
    pub fn selector(&self, action: Action) -> &str {
        match action {
            Action::Save => &self.save,
            Action::Skip => &self.skip,
            Action::Clear => &self.clear,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormStateOptions {
    /// Form data attribute (without the `data-` prefix) naming the form's group
    pub group_data_attrib: String,
    /// Prepended to every storage key
    #[serde(alias = "key_prefix")]
    pub key_prefix: String,
    pub triggers: TriggerSelectors,
    /// Non-empty: ask for confirmation before `clear`
    pub confirm_delete_text: String,
}

impl Default for FormStateOptions {
    fn default() -> Self {
        Self {
            group_data_attrib: "fs-group".to_string(),
            key_prefix: String::new(),
            triggers: TriggerSelectors::default(),
            confirm_delete_text: String::new(),
        }
    }
}

impl FormStateOptions {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_group_data_attrib(mut self, attrib: impl Into<String>) -> Self {
        self.group_data_attrib = attrib.into();
        self
    }

    pub fn with_confirm_delete_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_delete_text = text.into();
        self
    }

    pub fn with_trigger(mut self, action: Action, selector: impl Into<String>) -> Self {
        let selector = selector.into();
        match action {
            Action::Save => self.triggers.save = selector,
            Action::Skip => self.triggers.skip = selector,
            Action::Clear => self.triggers.clear = selector,
        }
        self
    }
}

/// Lifecycle points a callback can hook into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    InitComplete,
    SaveComplete,
    SkipComplete,
    ClearComplete,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::InitComplete => "initComplete",
            LifecycleEvent::SaveComplete => "saveComplete",
            LifecycleEvent::SkipComplete => "skipComplete",
            LifecycleEvent::ClearComplete => "clearComplete",
        }
    }
}

impl From<Action> for LifecycleEvent {
    fn from(action: Action) -> Self {
        match action {
            Action::Save => LifecycleEvent::SaveComplete,
            Action::Skip => LifecycleEvent::SkipComplete,
            Action::Clear => LifecycleEvent::ClearComplete,
        }
    }
}

/// `(form, data)`; `data` is the snapshot involved, if any
pub type FormCallback = Rc<dyn Fn(&dyn FormHandle, Option<&FormSnapshot>)>;

/// Optional lifecycle handlers; a missing handler is a no-op
#[derive(Clone, Default)]
pub struct Callbacks {
    init_complete: Option<FormCallback>,
    save_complete: Option<FormCallback>,
    skip_complete: Option<FormCallback>,
    clear_complete: Option<FormCallback>,
}

impl Callbacks {
    fn slot(&mut self, event: LifecycleEvent) -> &mut Option<FormCallback> {
        match event {
            LifecycleEvent::InitComplete => &mut self.init_complete,
            LifecycleEvent::SaveComplete => &mut self.save_complete,
            LifecycleEvent::SkipComplete => &mut self.skip_complete,
            LifecycleEvent::ClearComplete => &mut self.clear_complete,
        }
    }

    pub fn get(&self, event: LifecycleEvent) -> Option<&FormCallback> {
        match event {
            LifecycleEvent::InitComplete => self.init_complete.as_ref(),
            LifecycleEvent::SaveComplete => self.save_complete.as_ref(),
            LifecycleEvent::SkipComplete => self.skip_complete.as_ref(),
            LifecycleEvent::ClearComplete => self.clear_complete.as_ref(),
        }
    }

    pub fn set(&mut self, event: LifecycleEvent, callback: FormCallback) {
        *self.slot(event) = Some(callback);
    }

    pub fn invoke(
        &self,
        event: LifecycleEvent,
        form: &dyn FormHandle,
        data: Option<&FormSnapshot>,
    ) {
        if let Some(callback) = self.get(event) {
            callback(form, data);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("init_complete", &self.init_complete.is_some())
            .field("save_complete", &self.save_complete.is_some())
            .field("skip_complete", &self.skip_complete.is_some())
            .field("clear_complete", &self.clear_complete.is_some())
            .finish()
    }
}

/// Options plus callbacks for one binding call
#[derive(Clone, Debug, Default)]
pub struct FormStateConfig {
    pub options: FormStateOptions,
    pub callbacks: Callbacks,
}

impl FormStateConfig {
    pub fn new(options: FormStateOptions) -> Self {
        Self {
            options,
            callbacks: Callbacks::default(),
        }
    }

    pub fn on(
        mut self,
        event: LifecycleEvent,
        callback: impl Fn(&dyn FormHandle, Option<&FormSnapshot>) + 'static,
    ) -> Self {
        self.callbacks.set(event, Rc::new(callback));
        self
    }

    pub fn on_init_complete(
        self,
        callback: impl Fn(&dyn FormHandle, Option<&FormSnapshot>) + 'static,
    ) -> Self {
        self.on(LifecycleEvent::InitComplete, callback)
    }

    pub fn on_save_complete(
        self,
        callback: impl Fn(&dyn FormHandle, Option<&FormSnapshot>) + 'static,
    ) -> Self {
        self.on(LifecycleEvent::SaveComplete, callback)
    }

    pub fn on_skip_complete(
        self,
        callback: impl Fn(&dyn FormHandle, Option<&FormSnapshot>) + 'static,
    ) -> Self {
        self.on(LifecycleEvent::SkipComplete, callback)
    }

    pub fn on_clear_complete(
        self,
        callback: impl Fn(&dyn FormHandle, Option<&FormSnapshot>) + 'static,
    ) -> Self {
        self.on(LifecycleEvent::ClearComplete, callback)
    }

    /// Freezes the config for sharing across a binding
    pub fn into_shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}
