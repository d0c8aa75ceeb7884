//! Capture of a form's controls and the stored JSON entries.
//!
//! Capture follows browser form serialization: only successful controls
//! contribute. Grouped entries are merged here, before the write, since the
//! store itself only ever replaces whole values.

use contracts::shared::form_state::{FieldRecord, FormSnapshot, GroupEntry};

use super::error::FormStateError;
use super::key_resolver::FormKey;
use crate::shared::form_handle::{Control, ControlKind, FormHandle};
use crate::shared::storage::KeyValueStore;

/// Serializes every successful control of `form`, in document order
pub fn capture<F: FormHandle + ?Sized>(form: &F) -> FormSnapshot {
    form.controls().iter().flat_map(control_records).collect()
}

fn control_records(control: &Control) -> Vec<FieldRecord> {
    if control.name.is_empty() || control.disabled {
        return Vec::new();
    }
    match &control.kind {
        ControlKind::Button | ControlKind::File => Vec::new(),
        kind if kind.is_checkable() => {
            if control.checked {
                vec![FieldRecord::new(&control.name, &control.value)]
            } else {
                Vec::new()
            }
        }
        kind if kind.is_select() => control
            .selected_values()
            .map(|value| FieldRecord::new(&control.name, value))
            .collect(),
        _ => vec![FieldRecord::new(&control.name, &control.value)],
    }
}

/// Reads this form's snapshot: the whole entry, or its member of the group entry.
///
/// `Ok(None)` when nothing is stored; [`FormStateError::MalformedStoredData`]
/// when something is stored but does not decode.
pub fn read_snapshot<S: KeyValueStore + ?Sized>(
    key: &FormKey,
    store: &S,
) -> Result<Option<FormSnapshot>, FormStateError> {
    match key {
        FormKey::Single { key } => {
            let Some(raw) = store.get(key)? else {
                return Ok(None);
            };
            FormSnapshot::from_json(&raw)
                .map(Some)
                .map_err(|source| FormStateError::MalformedStoredData {
                    key: key.clone(),
                    source,
                })
        }
        FormKey::Grouped {
            group_key,
            member_key,
        } => Ok(read_group(group_key, store)?.and_then(|mut entry| entry.remove(member_key))),
    }
}

fn read_group<S: KeyValueStore + ?Sized>(
    group_key: &str,
    store: &S,
) -> Result<Option<GroupEntry>, FormStateError> {
    let Some(raw) = store.get(group_key)? else {
        return Ok(None);
    };
    GroupEntry::from_json(&raw)
        .map(Some)
        .map_err(|source| FormStateError::MalformedStoredData {
            key: group_key.to_string(),
            source,
        })
}

/// Group entry to merge into; an unreadable one is replaced
fn group_for_update<S: KeyValueStore + ?Sized>(
    group_key: &str,
    store: &S,
) -> Result<Option<GroupEntry>, FormStateError> {
    match read_group(group_key, store) {
        Err(err) if err.is_malformed() => {
            log::warn!("form_state: {}; treating group as empty", err);
            Ok(None)
        }
        other => other,
    }
}

/// Writes `snapshot` under `key`. Grouped keys replace only this form's member.
pub fn merge_and_write<S: KeyValueStore + ?Sized>(
    key: &FormKey,
    snapshot: &FormSnapshot,
    store: &S,
) -> Result<(), FormStateError> {
    let raw = match key {
        FormKey::Single { .. } => snapshot.to_json(),
        FormKey::Grouped {
            group_key,
            member_key,
        } => {
            let mut entry = group_for_update(group_key, store)?.unwrap_or_default();
            entry.insert(member_key.clone(), snapshot.clone());
            entry.to_json()
        }
    }
    .map_err(FormStateError::Encode)?;
    store.set(key.storage_key(), &raw)?;
    Ok(())
}

/// Removes this form's snapshot. A group entry left without members is deleted.
pub fn delete_record<S: KeyValueStore + ?Sized>(
    key: &FormKey,
    store: &S,
) -> Result<(), FormStateError> {
    match key {
        FormKey::Single { key } => store.remove(key)?,
        FormKey::Grouped {
            group_key,
            member_key,
        } => {
            let Some(mut entry) = group_for_update(group_key, store)? else {
                return Ok(());
            };
            entry.remove(member_key);
            if entry.is_empty() {
                store.remove(group_key)?;
            } else {
                let raw = entry.to_json().map_err(FormStateError::Encode)?;
                store.set(group_key, &raw)?;
            }
        }
    }
    Ok(())
}
