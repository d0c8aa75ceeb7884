//! Form state capture/restore protocol.
//!
//! Layers, leaves first: [`key_resolver`] derives storage keys, [`codec`]
//! captures forms and merges stored entries, [`synchronizer`] writes values
//! back onto controls, and [`controller`] ties them to the save/skip/clear
//! actions of one bound form.

pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod key_resolver;
pub mod synchronizer;

pub use config::{
    Action, Callbacks, FormCallback, FormStateConfig, FormStateOptions, LifecycleEvent,
    TriggerSelectors,
};
pub use controller::{ActionOutcome, FormStateController, Phase};
pub use error::FormStateError;
pub use key_resolver::{resolve_key, FormKey};
