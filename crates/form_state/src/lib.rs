pub mod shared;
pub mod state;
pub mod system;

pub use contracts::shared::form_state::{FieldRecord, FormSnapshot, GroupEntry};
pub use shared::form_handle::{Control, ControlKind, FormHandle};
pub use shared::storage::{KeyValueStore, StorageError};
pub use state::{
    Action, ActionOutcome, FormKey, FormStateConfig, FormStateController, FormStateError,
    FormStateOptions, LifecycleEvent,
};
pub use system::binding::{bind_form, bind_forms};
pub use system::hook::use_form_state;
