//! User-facing notifications and prompts supplied by the host.

/// Notification and prompt surface of the host UI.
///
/// Called from the caller thread during authorization and from background
/// tasks when reporting outcomes.
pub trait Notifier: Send + Sync {
    fn notify_info(&self, message: &str);

    fn notify_error(&self, message: &str);

    /// Asks the user to pick one of `options`. `None` means the prompt was dismissed.
    fn prompt_choice(&self, message: &str, options: &[&str]) -> Option<usize>;

    /// Asks the user for a line of text. `None` means the prompt was dismissed.
    fn prompt_input(&self, message: &str) -> Option<String>;
}
