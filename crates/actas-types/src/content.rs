//! Generated minutes content
//!
//! The drafting itself is done by an external generative service; this crate
//! only models the structured result so documents round-trip it intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured body of a drafted minutes document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub introduction: String,

    pub development: String,

    pub agreements: Vec<String>,

    pub commitments: Vec<CommitmentItem>,

    pub closure: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_meeting: Option<NextMeeting>,
}

/// An action item assigned during the meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentItem {
    pub description: String,

    /// Name of the person responsible
    pub responsible: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Follow-up meeting reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextMeeting {
    pub date: DateTime<Utc>,
    pub location: String,
}
