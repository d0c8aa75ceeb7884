//! Stored shape of a form's state.
//!
//! A [`FormSnapshot`] serializes to a JSON array of `{"name": .., "value": ..}`
//! objects, the same shape a browser form serializer produces. Forms that share
//! a group are stored together as a [`GroupEntry`], a JSON object mapping each
//! member key to its snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One captured form control value
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldRecord {
    pub name: String,
    pub value: String,
}

impl FieldRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered field records of one form at save time.
///
/// Records keep document order and may repeat a name: a checkbox group or a
/// multi-select contributes one record per checked/selected option.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FormSnapshot(Vec<FieldRecord>);

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(FieldRecord::new(name, value));
    }

    pub fn records(&self) -> &[FieldRecord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All values recorded under `name`, in order
    pub fn values_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |record| record.name == name)
            .map(|record| record.value.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

impl From<Vec<FieldRecord>> for FormSnapshot {
    fn from(records: Vec<FieldRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<FieldRecord> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = FieldRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FormSnapshot {
    type Item = &'a FieldRecord;
    type IntoIter = std::slice::Iter<'a, FieldRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Storage entry shared by every form of one group, keyed by member key
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct GroupEntry(BTreeMap<String, FormSnapshot>);

impl GroupEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, member_key: &str) -> Option<&FormSnapshot> {
        self.0.get(member_key)
    }

    /// Replaces the member's snapshot, leaving the other members as they are
    pub fn insert(&mut self, member_key: impl Into<String>, snapshot: FormSnapshot) {
        self.0.insert(member_key.into(), snapshot);
    }

    pub fn remove(&mut self, member_key: &str) -> Option<FormSnapshot> {
        self.0.remove(member_key)
    }

    pub fn contains(&self, member_key: &str) -> bool {
        self.0.contains_key(member_key)
    }

    pub fn member_keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
