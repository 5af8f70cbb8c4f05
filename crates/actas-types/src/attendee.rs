//! Attendee value objects embedded in an acta

use crate::ids::AttendeeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-attendee signature state.
///
/// Monotonic within the workflow: `Pending → Signed`, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    Pending,
    Signed,
}

/// Whether the attendee was present at the meeting. Descriptive only;
/// the signature workflow does not branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attendance {
    Present,
    Absent,
    Excused,
}

/// A meeting participant tracked for signature purposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    /// Unique within the owning acta, not globally
    pub id: AttendeeId,

    pub name: String,

    pub email: String,

    /// Free-form role description ("Secretary", "Chair", ...)
    pub role: String,

    pub attendance: Attendance,

    pub signature_status: SignatureStatus,

    /// Present only while a signature request is outstanding.
    /// Overwritten on re-issue; compared, not cleared, at signing time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_token: Option<String>,

    /// Opaque reference to the rendered signature image. Set exactly when
    /// `signature_status` becomes `Signed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,

    /// Set atomically with `signature_status = Signed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
}

impl Attendee {
    /// Create a pending attendee with no outstanding signature request
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        attendance: Attendance,
    ) -> Self {
        Self {
            id: AttendeeId::generate(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            attendance,
            signature_status: SignatureStatus::Pending,
            signature_token: None,
            signature_url: None,
            signed_at: None,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature_status == SignatureStatus::Signed
    }

    /// Transition to `Signed` with the given signature image reference.
    ///
    /// The caller is responsible for rejecting the transition when the
    /// attendee is already signed; this method only applies it.
    pub fn mark_signed(&mut self, signature_url: impl Into<String>, signed_at: DateTime<Utc>) {
        self.signature_status = SignatureStatus::Signed;
        self.signature_url = Some(signature_url.into());
        self.signed_at = Some(signed_at);
    }
}
