//! Per-form orchestration of initialize, save, skip and clear.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use contracts::shared::form_state::FormSnapshot;

use super::codec;
use super::config::{Action, FormStateConfig, LifecycleEvent};
use super::error::FormStateError;
use super::key_resolver::FormKey;
use super::synchronizer;
use crate::shared::confirm::{AlwaysConfirm, Confirmation};
use crate::shared::form_handle::FormHandle;
use crate::shared::storage::KeyValueStore;

/// What a controller is doing right now
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Initializing,
    Running(Action),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Initializing => f.write_str("initializing"),
            Phase::Running(action) => write!(f, "running {}", action),
        }
    }
}

/// Result of a dispatched action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Saved(FormSnapshot),
    Skipped,
    Cleared,
    /// `clear` was refused at the confirmation prompt; nothing changed
    Declined,
}

/// Resets the phase when an operation ends, including on early return
struct PhaseGuard<'a> {
    phase: &'a Cell<Phase>,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(Phase::Idle);
    }
}

/// Binds one form to a store.
///
/// The form's key is resolved once, at construction. Operations run to
/// completion synchronously; an operation requested while another one is
/// running is refused with [`FormStateError::ActionInProgress`]. Lifecycle
/// callbacks fire after the controller is back to [`Phase::Idle`], so they may
/// trigger further actions.
pub struct FormStateController<F, S> {
    form: F,
    store: S,
    config: Rc<FormStateConfig>,
    key: FormKey,
    confirmation: Box<dyn Confirmation>,
    phase: Cell<Phase>,
}

impl<F: FormHandle, S: KeyValueStore> FormStateController<F, S> {
    /// Fails with [`FormStateError::MissingFormName`] when the form cannot be keyed
    pub fn new(form: F, store: S, config: Rc<FormStateConfig>) -> Result<Self, FormStateError> {
        let key = FormKey::for_form(&form, &config.options)?;
        log::debug!("form_state: form keyed as {:?}", key);
        Ok(Self {
            form,
            store,
            config,
            key,
            confirmation: Box::new(AlwaysConfirm),
            phase: Cell::new(Phase::Idle),
        })
    }

    /// Prompt used before `clear` when `confirm_delete_text` is set
    pub fn with_confirmation(mut self, confirmation: impl Confirmation + 'static) -> Self {
        self.confirmation = Box::new(confirmation);
        self
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &FormKey {
        &self.key
    }

    pub fn config(&self) -> &FormStateConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    fn enter(&self, phase: Phase) -> Result<PhaseGuard<'_>, FormStateError> {
        let current = self.phase.get();
        if current != Phase::Idle {
            return Err(FormStateError::ActionInProgress(current));
        }
        self.phase.set(phase);
        Ok(PhaseGuard { phase: &self.phase })
    }

    fn notify(&self, event: LifecycleEvent, data: Option<&FormSnapshot>) {
        self.config.callbacks.invoke(event, &self.form, data);
    }

    /// Stored snapshot for this form; malformed data reads as none
    fn stored_snapshot(&self) -> Result<Option<FormSnapshot>, FormStateError> {
        match codec::read_snapshot(&self.key, &self.store) {
            Err(err) if err.is_malformed() => {
                log::warn!("form_state: {}; ignoring stored data", err);
                Ok(None)
            }
            other => other,
        }
    }

    /// Populates the form from the store and fires `initComplete` with the
    /// snapshot that was applied, or `None`.
    pub fn initialize(&self) -> Result<Option<FormSnapshot>, FormStateError> {
        let data = {
            let _guard = self.enter(Phase::Initializing)?;
            let data = self.stored_snapshot()?;
            if let Some(snapshot) = &data {
                synchronizer::populate(&self.form, snapshot);
            }
            data
        };
        log::info!(
            "form_state: initialized `{}` ({})",
            self.key.storage_key(),
            if data.is_some() { "restored" } else { "no stored data" }
        );
        self.notify(LifecycleEvent::InitComplete, data.as_ref());
        Ok(data)
    }

    /// Whether a well-formed snapshot is stored for this form
    pub fn has_stored_data(&self) -> Result<bool, FormStateError> {
        Ok(self.stored_snapshot()?.is_some())
    }

    pub fn dispatch(&self, action: Action) -> Result<ActionOutcome, FormStateError> {
        match action {
            Action::Save => self.save().map(ActionOutcome::Saved),
            Action::Skip => self.skip().map(|_| ActionOutcome::Skipped),
            Action::Clear => self.clear().map(|cleared| {
                if cleared {
                    ActionOutcome::Cleared
                } else {
                    ActionOutcome::Declined
                }
            }),
        }
    }

    /// Captures the form and writes it. Fields are left as they are.
    pub fn save(&self) -> Result<FormSnapshot, FormStateError> {
        let snapshot = {
            let _guard = self.enter(Phase::Running(Action::Save))?;
            let snapshot = codec::capture(&self.form);
            codec::merge_and_write(&self.key, &snapshot, &self.store)?;
            snapshot
        };
        log::info!(
            "form_state: saved {} field(s) under `{}`",
            snapshot.len(),
            self.key.storage_key()
        );
        self.notify(LifecycleEvent::SaveComplete, Some(&snapshot));
        Ok(snapshot)
    }

    /// Empties the fields without touching the store
    pub fn skip(&self) -> Result<(), FormStateError> {
        {
            let _guard = self.enter(Phase::Running(Action::Skip))?;
            synchronizer::clear(&self.form);
        }
        self.notify(LifecycleEvent::SkipComplete, None);
        Ok(())
    }

    /// Deletes the stored snapshot, then empties the fields.
    ///
    /// Returns `false` when the confirmation prompt was declined, in which case
    /// neither the store nor the fields changed and no callback fired. A store
    /// failure leaves the fields untouched.
    pub fn clear(&self) -> Result<bool, FormStateError> {
        {
            let _guard = self.enter(Phase::Running(Action::Clear))?;
            let prompt = &self.config.options.confirm_delete_text;
            if !prompt.is_empty() && !self.confirmation.confirm(prompt) {
                log::debug!("form_state: clear of `{}` declined", self.key.storage_key());
                return Ok(false);
            }
            codec::delete_record(&self.key, &self.store)?;
            synchronizer::clear(&self.form);
        }
        log::info!("form_state: cleared `{}`", self.key.storage_key());
        self.notify(LifecycleEvent::ClearComplete, None);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::memory_form::MemoryForm;
    use crate::shared::storage::{MemoryStore, StorageError};
    use crate::state::config::FormStateOptions;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<(LifecycleEvent, Option<FormSnapshot>)>>>;

    fn recording_config(options: FormStateOptions) -> (Rc<FormStateConfig>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut config = FormStateConfig::new(options);
        for event in [
            LifecycleEvent::InitComplete,
            LifecycleEvent::SaveComplete,
            LifecycleEvent::SkipComplete,
            LifecycleEvent::ClearComplete,
        ] {
            let log = Rc::clone(&log);
            config = config.on(event, move |_, data| {
                log.borrow_mut().push((event, data.cloned()));
            });
        }
        (config.into_shared(), log)
    }

    fn stored_json(store: &MemoryStore, key: &str) -> Value {
        serde_json::from_str(&store.raw(key).unwrap()).unwrap()
    }

    /// Store whose writes can be switched off
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        broken: Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.broken.get() {
                return Err(StorageError::WriteRejected {
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            if self.broken.get() {
                return Err(StorageError::Unavailable("gone".to_string()));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_profile_scenario() {
        let store = Rc::new(MemoryStore::new());
        let (config, log) = recording_config(FormStateOptions::default().with_key_prefix("key_"));

        let first = FormStateController::new(
            MemoryForm::named("profile").text("email", "a@b.com"),
            Rc::clone(&store),
            Rc::clone(&config),
        )
        .unwrap();
        assert_eq!(first.initialize().unwrap(), None);
        first.save().unwrap();

        assert_eq!(
            store.raw("key_profile").as_deref(),
            Some(r#"[{"name":"email","value":"a@b.com"}]"#)
        );

        let reloaded = FormStateController::new(
            MemoryForm::named("profile").text("email", ""),
            Rc::clone(&store),
            config,
        )
        .unwrap();
        let restored = reloaded.initialize().unwrap().unwrap();

        assert_eq!(reloaded.form().value_of("email").as_deref(), Some("a@b.com"));
        assert_eq!(restored.len(), 1);
        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], (LifecycleEvent::InitComplete, None));
        assert_eq!(log[1].0, LifecycleEvent::SaveComplete);
        assert_eq!(log[2], (LifecycleEvent::InitComplete, Some(restored)));
    }

    #[test]
    fn test_checkout_group_scenario() {
        let store = Rc::new(MemoryStore::new());
        let config =
            FormStateConfig::new(FormStateOptions::default().with_key_prefix("k_")).into_shared();
        let billing = FormStateController::new(
            MemoryForm::named("billing")
                .with_data("fs-group", "checkout")
                .text("card", "4111"),
            Rc::clone(&store),
            Rc::clone(&config),
        )
        .unwrap();
        let shipping = FormStateController::new(
            MemoryForm::named("shipping")
                .with_data("fs-group", "checkout")
                .text("city", "Oslo"),
            Rc::clone(&store),
            config,
        )
        .unwrap();

        billing.save().unwrap();
        assert_eq!(
            stored_json(&store, "k_checkout"),
            json!({ "k_billing": [{ "name": "card", "value": "4111" }] })
        );

        shipping.save().unwrap();
        assert_eq!(
            stored_json(&store, "k_checkout"),
            json!({
                "k_billing": [{ "name": "card", "value": "4111" }],
                "k_shipping": [{ "name": "city", "value": "Oslo" }]
            })
        );

        billing.clear().unwrap();
        assert_eq!(
            stored_json(&store, "k_checkout"),
            json!({ "k_shipping": [{ "name": "city", "value": "Oslo" }] })
        );
        assert_eq!(billing.form().value_of("card").as_deref(), Some(""));
        assert_eq!(shipping.form().value_of("city").as_deref(), Some("Oslo"));

        shipping.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_grouped_form_restores_only_its_member() {
        let store = MemoryStore::new().with_entry(
            "checkout",
            concat!(
                r#"{"billing":[{"name":"card","value":"4111"}],"#,
                r#""shipping":[{"name":"card","value":"9999"}]}"#,
            ),
        );
        let form = MemoryForm::named("shipping")
            .with_data("fs-group", "checkout")
            .text("card", "");
        let controller =
            FormStateController::new(form, store, Rc::new(FormStateConfig::default())).unwrap();

        let restored = controller.initialize().unwrap().unwrap();

        assert_eq!(restored.values_for("card").collect::<Vec<_>>(), vec!["9999"]);
        assert_eq!(controller.form().value_of("card").as_deref(), Some("9999"));
    }

    #[test]
    fn test_malformed_data_initializes_as_empty() {
        let store = MemoryStore::new().with_entry("profile", "definitely not json");
        let (config, log) = recording_config(FormStateOptions::default());
        let controller = FormStateController::new(
            MemoryForm::named("profile").text("email", "typed"),
            store,
            config,
        )
        .unwrap();

        assert_eq!(controller.initialize().unwrap(), None);
        assert!(!controller.has_stored_data().unwrap());
        assert_eq!(controller.form().value_of("email").as_deref(), Some("typed"));
        assert_eq!(*log.borrow(), vec![(LifecycleEvent::InitComplete, None)]);
    }

    #[test]
    fn test_unnamed_form_cannot_bind() {
        let result = FormStateController::new(
            MemoryForm::unnamed(),
            MemoryStore::new(),
            Rc::new(FormStateConfig::default()),
        );

        assert!(matches!(result, Err(FormStateError::MissingFormName)));
    }

    #[test]
    fn test_skip_clears_fields_but_keeps_store() {
        let (config, log) = recording_config(FormStateOptions::default());
        let controller = FormStateController::new(
            MemoryForm::named("f").text("a", "1").checkbox("c", "on", true),
            MemoryStore::new(),
            config,
        )
        .unwrap();
        controller.save().unwrap();

        assert_eq!(controller.dispatch(Action::Skip).unwrap(), ActionOutcome::Skipped);

        assert_eq!(controller.form().value_of("a").as_deref(), Some(""));
        assert!(controller.form().checked_values("c").is_empty());
        assert!(controller.has_stored_data().unwrap());
        assert_eq!(log.borrow().last(), Some(&(LifecycleEvent::SkipComplete, None)));
    }

    #[test]
    fn test_declined_clear_changes_nothing() {
        let (config, log) = recording_config(
            FormStateOptions::default().with_confirm_delete_text("Delete saved data?"),
        );
        let asked = Rc::new(RefCell::new(Vec::new()));
        let prompts = Rc::clone(&asked);
        let controller = FormStateController::new(
            MemoryForm::named("f").text("a", "1"),
            MemoryStore::new(),
            config,
        )
        .unwrap()
        .with_confirmation(move |message: &str| {
            prompts.borrow_mut().push(message.to_string());
            false
        });
        controller.save().unwrap();
        let stored = controller.store().raw("f");

        assert_eq!(controller.dispatch(Action::Clear).unwrap(), ActionOutcome::Declined);

        assert_eq!(*asked.borrow(), vec!["Delete saved data?".to_string()]);
        assert_eq!(controller.store().raw("f"), stored);
        assert_eq!(controller.form().value_of("a").as_deref(), Some("1"));
        assert!(log
            .borrow()
            .iter()
            .all(|(event, _)| *event != LifecycleEvent::ClearComplete));
    }

    #[test]
    fn test_confirmed_clear() {
        let (config, log) = recording_config(
            FormStateOptions::default().with_confirm_delete_text("Delete saved data?"),
        );
        let controller = FormStateController::new(
            MemoryForm::named("f").text("a", "1"),
            MemoryStore::new(),
            config,
        )
        .unwrap()
        .with_confirmation(|_: &str| true);
        controller.save().unwrap();

        assert_eq!(controller.dispatch(Action::Clear).unwrap(), ActionOutcome::Cleared);

        assert!(controller.store().is_empty());
        assert_eq!(controller.form().value_of("a").as_deref(), Some(""));
        assert_eq!(log.borrow().last(), Some(&(LifecycleEvent::ClearComplete, None)));
    }

    #[test]
    fn test_clear_without_prompt_text_never_asks() {
        let controller = FormStateController::new(
            MemoryForm::named("f").text("a", "1"),
            MemoryStore::new(),
            Rc::new(FormStateConfig::default()),
        )
        .unwrap()
        .with_confirmation(|_: &str| -> bool { panic!("no prompt expected") });

        assert!(controller.clear().unwrap());
    }

    #[test]
    fn test_failed_save_has_no_effects() {
        let (config, log) = recording_config(FormStateOptions::default());
        let controller = FormStateController::new(
            MemoryForm::named("f").text("a", "1"),
            FlakyStore::default(),
            config,
        )
        .unwrap();
        controller.store().broken.set(true);

        let err = controller.dispatch(Action::Save).unwrap_err();

        assert!(matches!(err, FormStateError::Storage(StorageError::WriteRejected { .. })));
        assert!(controller.store().inner.is_empty());
        assert!(log.borrow().is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_failed_clear_keeps_fields() {
        let (config, log) = recording_config(FormStateOptions::default());
        let controller = FormStateController::new(
            MemoryForm::named("f").text("a", "1"),
            FlakyStore::default(),
            config,
        )
        .unwrap();
        controller.save().unwrap();
        controller.store().broken.set(true);

        assert!(controller.clear().is_err());

        assert_eq!(controller.form().value_of("a").as_deref(), Some("1"));
        assert!(controller.store().inner.contains("f"));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_callbacks_may_trigger_actions() {
        let store = Rc::new(MemoryStore::new());
        let slot: Rc<RefCell<Option<Rc<FormStateController<MemoryForm, Rc<MemoryStore>>>>>> =
            Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let config = FormStateConfig::default()
            .on_save_complete(move |_, _| {
                if let Some(controller) = inner.borrow().as_ref() {
                    controller.skip().unwrap();
                }
            })
            .into_shared();
        let controller = Rc::new(
            FormStateController::new(
                MemoryForm::named("f").text("a", "1"),
                Rc::clone(&store),
                config,
            )
            .unwrap(),
        );
        *slot.borrow_mut() = Some(Rc::clone(&controller));

        controller.save().unwrap();

        assert!(store.contains("f"));
        assert_eq!(controller.form().value_of("a").as_deref(), Some(""));
        slot.borrow_mut().take();
    }

    #[test]
    fn test_reentrant_request_is_refused() {
        let controller = FormStateController::new(
            MemoryForm::named("f"),
            MemoryStore::new(),
            Rc::new(FormStateConfig::default()),
        )
        .unwrap();
        let _guard = controller.enter(Phase::Running(Action::Save)).unwrap();

        assert!(matches!(
            controller.skip(),
            Err(FormStateError::ActionInProgress(Phase::Running(Action::Save)))
        ));
    }
}
