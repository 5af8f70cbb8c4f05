//! Acta persistence abstractions.
//!
//! This crate defines the storage contract the signature workflow and the
//! REST surface read and write through:
//! - acta documents (system of record, revision-stamped)
//! - user profiles for requester-identity lookups
//!
//! Design stance:
//! - The workflow engine is backend-agnostic; it receives an `ActaStore`
//!   at construction. Backend selection lives in the composition layer.
//! - Every document write is revision-checked. Read-modify-write callers
//!   pass the revision they read and handle `StorageError::Conflict`.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
mod model;
#[cfg(feature = "postgres")]
pub mod postgres;
mod traits;

pub use error::{StorageError, StorageResult};
pub use model::{ActaUpdate, NewActa};
pub use traits::{ActaStore, QueryWindow};
