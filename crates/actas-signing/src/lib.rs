//! Signature workflow engine.
//!
//! Tracks per-attendee signature state across a multi-party approval
//! process. Three operations drive the state machine:
//!
//! - **issue requests**: mint a fresh token per outstanding attendee, mail
//!   each a signing link, persist the tokens in one revision-checked write.
//! - **verify token**: read-only check that a presented token matches the
//!   attendee's stored one.
//! - **record signature**: token-gated transition `pending → signed`, with
//!   completion derived over the whole attendee list.
//!
//! The engine is backend-agnostic: it receives an [`ActaStore`] and a
//! [`NotificationSender`](actas_notify::NotificationSender) at construction
//! and never selects backends itself.

#![deny(unsafe_code)]

mod error;
mod link;
mod token;
mod workflow;

pub use error::{SigningError, SigningResult};
pub use link::SigningLinks;
pub use token::generate_signature_token;
pub use workflow::{
    ActaSummary, AttendeeSummary, DeliveryResult, IssueOutcome, RecordOutcome, SignatureWorkflow,
    VerifyOutcome,
};

pub use actas_storage::ActaStore;
