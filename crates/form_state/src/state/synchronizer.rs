//! Writes snapshots onto live controls and forces controls to their empty state.

use std::collections::HashSet;

use contracts::shared::form_state::FormSnapshot;

use crate::shared::form_handle::{Control, ControlKind, FormHandle};

/// Applies `snapshot` to the form's controls.
///
/// Single-valued controls take each record's value in turn, so the last record
/// for a name wins. Checkboxes, radios and multi-selects are applied once per
/// name using every value recorded for it: exactly the options whose value was
/// recorded end up checked or selected. A group none of whose options carries a
/// recorded value is left as it is. Records without a live control are
/// skipped.
///
/// Returns `true` when at least one record reached a live control.
pub fn populate<F: FormHandle + ?Sized>(form: &F, snapshot: &FormSnapshot) -> bool {
    let controls = form.controls();
    let mut applied_names: HashSet<&str> = HashSet::new();
    let mut applied = false;

    for record in snapshot {
        let matches: Vec<&Control> = controls
            .iter()
            .filter(|control| control.name == record.name)
            .collect();
        let Some(first) = matches.first() else {
            log::debug!("form_state: no field named `{}`, record skipped", record.name);
            continue;
        };

        if first.kind.is_multi_valued() {
            if !applied_names.insert(record.name.as_str()) {
                continue;
            }
            let values: Vec<&str> = snapshot.values_for(&record.name).collect();
            if apply_multi_valued(form, &matches, &values) {
                applied = true;
            } else {
                log::debug!(
                    "form_state: no option of `{}` matches its stored values, records skipped",
                    record.name
                );
            }
        } else {
            applied = true;
            for control in &matches {
                form.set_value(control.index, &record.value);
            }
        }
    }

    applied
}

/// Returns `false`, touching nothing, when no option matches a recorded value
fn apply_multi_valued<F: FormHandle + ?Sized>(
    form: &F,
    matches: &[&Control],
    values: &[&str],
) -> bool {
    let any_match = matches.iter().any(|control| match control.kind {
        ControlKind::Checkbox | ControlKind::Radio => values.contains(&control.value.as_str()),
        ControlKind::SelectMultiple => control
            .options
            .iter()
            .any(|option| values.contains(&option.value.as_str())),
        _ => false,
    });
    if !any_match {
        return false;
    }

    for control in matches {
        match control.kind {
            ControlKind::Checkbox | ControlKind::Radio => {
                form.set_checked(control.index, values.contains(&control.value.as_str()));
            }
            ControlKind::SelectMultiple => form.set_selected(control.index, values),
            _ => {}
        }
    }
    true
}

/// Forces every supported control to its empty state.
///
/// This is not a form reset: default values from the markup are ignored.
pub fn clear<F: FormHandle + ?Sized>(form: &F) {
    for control in form.controls() {
        match control.kind {
            ControlKind::Text
            | ControlKind::Password
            | ControlKind::TextArea
            | ControlKind::Hidden => {
                if !control.value.is_empty() {
                    form.set_value(control.index, "");
                }
            }
            ControlKind::Checkbox | ControlKind::Radio => {
                if control.checked {
                    form.set_checked(control.index, false);
                }
            }
            ControlKind::SelectOne | ControlKind::SelectMultiple => {
                form.set_selected(control.index, &[]);
            }
            _ => {}
        }
    }
}
