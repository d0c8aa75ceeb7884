pub mod binding;
pub mod hook;
pub mod js_api;
