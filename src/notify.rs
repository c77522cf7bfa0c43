//! User-facing notification seam.
//!
//! Tracks never touch the page directly; anything the user has to see
//! (backend error payloads, size warnings) goes through a sink supplied
//! by the host.

use std::cell::RefCell;

pub trait NotificationSink {
    fn alert(&self, message: &str);
}

/// Default sink, forwards to the log facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn alert(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Sink that keeps every alert in order. Used by tests and by hosts that
/// batch messages into their own UI.
#[derive(Debug, Default)]
pub struct CollectedAlerts {
    messages: RefCell<Vec<String>>,
}

impl CollectedAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl NotificationSink for CollectedAlerts {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
