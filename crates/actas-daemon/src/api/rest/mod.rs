//! REST API: router, shared state, request handlers

pub mod handlers;
pub mod router;
pub mod state;
