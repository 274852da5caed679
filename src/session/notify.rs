//! User-facing notifications for save and load results.

/// Receives short messages meant for the user.
///
/// Hosts route these to a toast, a status bar or a desktop notification.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        log::info!("Notification: {}", message);
    }
}

/// Keeps every notification in order, for hosts that poll and for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
