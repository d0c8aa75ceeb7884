use thiserror::Error;

use super::controller::Phase;
use crate::shared::storage::StorageError;

/// Errors of the form state core
#[derive(Debug, Error)]
pub enum FormStateError {
    #[error("form has no name attribute and cannot be keyed")]
    MissingFormName,

    #[error("malformed data stored under `{key}`: {source}")]
    MalformedStoredData {
        key: String,
        source: serde_json::Error,
    },

    #[error("could not encode form state: {0}")]
    Encode(serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("form is busy ({0}), request refused")]
    ActionInProgress(Phase),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl FormStateError {
    /// Stored data exists but cannot be read back; callers treat it as "no data"
    pub fn is_malformed(&self) -> bool {
        matches!(self, FormStateError::MalformedStoredData { .. })
    }
}
