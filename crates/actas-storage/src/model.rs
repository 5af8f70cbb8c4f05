use actas_types::{
    ActaStatus, Attendee, GeneratedContent, MeetingInfo, OrganizationId, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation payload for an acta. The store assigns the id, an initial
/// revision, and creation/update timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActa {
    pub organization_id: OrganizationId,
    pub created_by: UserId,
    pub meeting_info: MeetingInfo,
    pub attendees: Vec<Attendee>,
    pub agenda: Vec<String>,
    pub raw_content: String,
    pub audio_url: Option<String>,
}

/// Partial-field update for an acta. `None` fields are left untouched.
///
/// The attendee list is always written as a whole; there is no per-attendee
/// patch. The revision check on `update_acta` is what keeps concurrent
/// full-list writers from silently dropping each other's changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActaUpdate {
    pub status: Option<ActaStatus>,
    pub meeting_info: Option<MeetingInfo>,
    pub attendees: Option<Vec<Attendee>>,
    pub agenda: Option<Vec<String>>,
    pub raw_content: Option<String>,
    pub audio_url: Option<String>,
    pub pdf_url: Option<String>,
    pub generated_content: Option<GeneratedContent>,
    pub completed_at: Option<DateTime<Utc>>,
    pub signature_requests_sent_at: Option<DateTime<Utc>>,
}

impl ActaUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.meeting_info.is_none()
            && self.attendees.is_none()
            && self.agenda.is_none()
            && self.raw_content.is_none()
            && self.audio_url.is_none()
            && self.pdf_url.is_none()
            && self.generated_content.is_none()
            && self.completed_at.is_none()
            && self.signature_requests_sent_at.is_none()
    }
}
