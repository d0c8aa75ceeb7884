//! Storage keys of a form.
//!
//! Keys are plain concatenations of the configured prefix with the form name or
//! group name. Avoiding collisions between unrelated forms is up to whoever
//! picks the prefixes and groups.

use super::config::FormStateOptions;
use super::error::FormStateError;
use crate::shared::form_handle::FormHandle;

/// Where a form's snapshot lives in the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormKey {
    /// The snapshot is the whole entry under `key`
    Single { key: String },
    /// The snapshot is `entry[member_key]` inside the entry under `group_key`.
    /// `member_key` is never used against the store directly.
    Grouped {
        group_key: String,
        member_key: String,
    },
}

impl FormKey {
    pub fn resolve(
        form_name: &str,
        group: Option<&str>,
        prefix: &str,
    ) -> Result<Self, FormStateError> {
        if form_name.is_empty() {
            return Err(FormStateError::MissingFormName);
        }
        let member_key = format!("{}{}", prefix, form_name);
        Ok(match group.filter(|group| !group.is_empty()) {
            Some(group) => FormKey::Grouped {
                group_key: format!("{}{}", prefix, group),
                member_key,
            },
            None => FormKey::Single { key: member_key },
        })
    }

    /// Reads the form's name and group attribute and resolves its key
    pub fn for_form<F: FormHandle + ?Sized>(
        form: &F,
        options: &FormStateOptions,
    ) -> Result<Self, FormStateError> {
        let name = form.name().unwrap_or_default();
        let group = form.data_attribute(&options.group_data_attrib);
        Self::resolve(&name, group.as_deref(), &options.key_prefix)
    }

    /// The key used against the store
    pub fn storage_key(&self) -> &str {
        match self {
            FormKey::Single { key } => key,
            FormKey::Grouped { group_key, .. } => group_key,
        }
    }

    pub fn member_key(&self) -> Option<&str> {
        match self {
            FormKey::Single { .. } => None,
            FormKey::Grouped { member_key, .. } => Some(member_key),
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, FormKey::Grouped { .. })
    }
}

/// The store key for a form: the group key when grouped, otherwise the form key
pub fn resolve_key(
    form_name: &str,
    group: Option<&str>,
    prefix: &str,
) -> Result<String, FormStateError> {
    FormKey::resolve(form_name, group, prefix).map(|key| key.storage_key().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::memory_form::MemoryForm;

    #[test]
    fn test_ungrouped_key() {
        assert_eq!(resolve_key("profile", None, "key_").unwrap(), "key_profile");
        assert_eq!(resolve_key("profile", Some(""), "key_").unwrap(), "key_profile");
    }

    #[test]
    fn test_grouped_key() {
        let key = FormKey::resolve("billing", Some("checkout"), "k_").unwrap();

        assert_eq!(key.storage_key(), "k_checkout");
        assert_eq!(key.member_key(), Some("k_billing"));
        assert!(key.is_grouped());
    }

    #[test]
    fn test_missing_name() {
        assert!(matches!(
            resolve_key("", Some("g"), "p_"),
            Err(FormStateError::MissingFormName)
        ));
    }

    #[test]
    fn test_key_from_form_attributes() {
        let options = FormStateOptions::default().with_key_prefix("k_");
        let grouped = MemoryForm::named("shipping").with_data("fs-group", "checkout");
        let plain = MemoryForm::named("shipping");

        assert_eq!(
            FormKey::for_form(&grouped, &options).unwrap(),
            FormKey::Grouped {
                group_key: "k_checkout".to_string(),
                member_key: "k_shipping".to_string(),
            }
        );
        assert_eq!(
            FormKey::for_form(&plain, &options).unwrap(),
            FormKey::Single {
                key: "k_shipping".to_string()
            }
        );
        assert!(FormKey::for_form(&MemoryForm::unnamed(), &options).is_err());
    }

    #[test]
    fn test_custom_group_attribute() {
        let options = FormStateOptions::default().with_group_data_attrib("bundle");
        let form = MemoryForm::named("a")
            .with_data("fs-group", "ignored")
            .with_data("bundle", "b");

        assert_eq!(FormKey::for_form(&form, &options).unwrap().storage_key(), "b");
    }
}
