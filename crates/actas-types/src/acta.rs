//! The acta aggregate root

use crate::attendee::{Attendee, SignatureStatus};
use crate::content::GeneratedContent;
use crate::ids::{ActaId, AttendeeId, OrganizationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document lifecycle state.
///
/// `Completed` is derived by the signature workflow: it holds exactly when
/// every attendee has signed. Nothing else sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActaStatus {
    Draft,
    PendingSignatures,
    Completed,
}

/// Meeting format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    InPerson,
    Virtual,
    Hybrid,
}

/// Descriptive metadata about the meeting itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingInfo {
    pub title: String,

    pub date: DateTime<Utc>,

    /// Wall-clock start, e.g. "10:00"
    pub start_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    pub location: String,

    pub modality: Modality,
}

/// A minutes document: meeting metadata, attendee signature state, and the
/// (externally) generated content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acta {
    pub id: ActaId,

    /// Tenant partition key; every authorization check compares this
    pub organization_id: OrganizationId,

    pub created_by: UserId,

    pub status: ActaStatus,

    pub meeting_info: MeetingInfo,

    /// Order is display order only; the workflow does not depend on it
    pub attendees: Vec<Attendee>,

    pub agenda: Vec<String>,

    /// Raw notes or transcript the draft was generated from
    pub raw_content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_content: Option<GeneratedContent>,

    /// Optimistic-concurrency stamp; bumped by the store on every update
    pub revision: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_requests_sent_at: Option<DateTime<Utc>>,
}

impl Acta {
    pub fn attendee(&self, id: &AttendeeId) -> Option<&Attendee> {
        self.attendees.iter().find(|a| &a.id == id)
    }

    pub fn attendee_mut(&mut self, id: &AttendeeId) -> Option<&mut Attendee> {
        self.attendees.iter_mut().find(|a| &a.id == id)
    }

    /// True when every attendee has signed. Vacuously true for an empty
    /// attendee list; callers guard whether that is meaningful.
    pub fn all_signed(&self) -> bool {
        self.attendees
            .iter()
            .all(|a| a.signature_status == SignatureStatus::Signed)
    }

    /// Attendees still awaiting a signature
    pub fn pending_attendees(&self) -> impl Iterator<Item = &Attendee> {
        self.attendees.iter().filter(|a| !a.is_signed())
    }
}
