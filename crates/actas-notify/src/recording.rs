//! Recording sender for tests.

use crate::{EmailMessage, NotificationSender, NotifyError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Captures every message instead of delivering it, with optional
/// per-recipient failure injection for partial-delivery tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `address` fail.
    pub fn fail_for(&self, address: impl Into<String>) {
        self.failing
            .lock()
            .expect("failing lock poisoned")
            .insert(address.into());
    }

    /// Messages accepted so far, in send order.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        if self
            .failing
            .lock()
            .expect("failing lock poisoned")
            .contains(&message.to)
        {
            return Err(NotifyError::SendFailed(format!(
                "injected failure for {}",
                message.to
            )));
        }
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push(message.clone());
        Ok(())
    }
}
