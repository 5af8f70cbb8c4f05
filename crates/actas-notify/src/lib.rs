//! Notification delivery for the signature workflow.
//!
//! The workflow engine hands a fully rendered [`EmailMessage`] to a
//! [`NotificationSender`]; delivery failures are reported back per message
//! and never retried here. Retry, if desired, is a caller concern.

#![deny(unsafe_code)]

mod recording;
mod smtp;
mod template;

pub use recording::RecordingNotifier;
pub use smtp::SmtpNotifier;
pub use template::SignatureRequestEmail;

use async_trait::async_trait;
use thiserror::Error;

/// Notification delivery errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    #[error("invalid notifier configuration: {0}")]
    InvalidConfig(String),
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Delivery seam between the workflow engine and the mail transport.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// Sender that accepts everything without delivering anything.
///
/// Used when no mail transport is configured (local development); each
/// accepted message is logged so signing links remain discoverable.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl NotificationSender for NoopNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        tracing::warn!(to = %message.to, subject = %message.subject, "email delivery disabled, dropping message");
        Ok(())
    }
}
