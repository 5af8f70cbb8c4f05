//! API request handlers

mod actas;
mod auth;
mod health;
mod signatures;
mod users;

pub use actas::*;
pub use health::*;
pub use signatures::*;
pub use users::*;

pub(crate) use auth::authenticated_user;
