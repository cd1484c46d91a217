use crate::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Single-slot status area. Each `show` replaces what was there before.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message`, replacing any current notification. An empty message clears the slot.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        if message.is_empty() {
            self.clear();
            return;
        }
        self.current = Some(Notification { message, severity });
    }

    pub fn show_error(&mut self, error: &WorkflowError) {
        self.show(error.message(), error.severity());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_replaces_previous() {
        let mut notifier = Notifier::new();
        notifier.show("first", Severity::Info);
        notifier.show("second", Severity::Danger);
        assert_eq!(
            notifier.current(),
            Some(&Notification {
                message: "second".to_string(),
                severity: Severity::Danger,
            })
        );
    }

    #[test]
    fn empty_message_clears() {
        let mut notifier = Notifier::new();
        notifier.show("hello", Severity::Success);
        notifier.show("", Severity::Warning);
        assert!(notifier.current().is_none());
    }
}
