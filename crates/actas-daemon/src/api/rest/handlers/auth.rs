//! Caller identity resolution.
//!
//! Authentication proper (session issuance, token validation) sits in
//! front of this service; requests arrive with the already-verified user
//! id in the `x-actas-user` header. This module resolves that id to a
//! stored profile and rejects requests without one.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use actas_types::{UserId, UserProfile};
use axum::http::HeaderMap;

pub const USER_HEADER: &str = "x-actas-user";

/// Resolve the calling user from request headers.
pub async fn authenticated_user(state: &AppState, headers: &HeaderMap) -> ApiResult<UserProfile> {
    let user_id = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated(format!("missing {USER_HEADER} header")))?;

    state
        .store
        .get_user(&UserId::new(user_id))
        .await?
        .ok_or_else(|| ApiError::Unauthenticated(format!("unknown user {user_id}")))
}
