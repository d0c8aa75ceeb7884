/// Asks the user before a destructive action
pub trait Confirmation {
    fn confirm(&self, message: &str) -> bool;
}

/// Never prompts
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// `window.confirm(message)`; a missing window or a blocked dialog counts as "no"
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowConfirm;

impl Confirmation for WindowConfirm {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
