//! Signing link construction.

use actas_types::{ActaId, AttendeeId};

/// Builds the URLs embedded in signature-request emails.
#[derive(Debug, Clone)]
pub struct SigningLinks {
    base_url: String,
}

impl SigningLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Signing page URL carrying the acta, attendee and token.
    pub fn signing_url(&self, acta_id: &ActaId, attendee_id: &AttendeeId, token: &str) -> String {
        format!(
            "{}/actas/{}/sign?token={}&attendeeId={}",
            self.base_url, acta_id, token, attendee_id
        )
    }
}
