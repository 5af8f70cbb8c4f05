//! Actas domain types
//!
//! An *acta* is the aggregate record of one meeting: descriptive metadata,
//! the attendee list, and the per-attendee signature state that drives the
//! signing workflow.
//!
//! # Key Concepts
//!
//! - **Acta**: The minutes document, owned by one organization.
//! - **Attendee**: A participant embedded in the acta, tracked for signature
//!   purposes. Signature status is monotonic: `pending → signed`, never back.
//! - **Signature token**: An opaque secret authorizing one pending signing
//!   action for one attendee. Issued by the workflow engine, never by hand.
//! - **Completion**: The acta is `completed` exactly when every attendee
//!   has signed.

#![deny(unsafe_code)]

mod acta;
mod attendee;
mod content;
mod ids;
mod user;

pub use acta::{Acta, ActaStatus, MeetingInfo, Modality};
pub use attendee::{Attendance, Attendee, SignatureStatus};
pub use content::{CommitmentItem, GeneratedContent, NextMeeting};
pub use ids::{ActaId, AttendeeId, OrganizationId, UserId};
pub use user::{UserProfile, UserRole};
