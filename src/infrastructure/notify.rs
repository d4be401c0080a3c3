use crate::ports::Notifier;

/// Notifier that routes user-visible warnings to the log. A UI shell would
/// swap in a toast-backed implementation.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}
