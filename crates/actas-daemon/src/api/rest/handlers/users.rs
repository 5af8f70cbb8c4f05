//! User profile handlers

use super::authenticated_user;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use actas_types::{OrganizationId, UserId, UserProfile, UserRole};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

/// Upsert user request
#[derive(Debug, Deserialize)]
pub struct UpsertUserRequest {
    pub email: String,
    pub display_name: String,
    pub organization_id: OrganizationId,
    pub role: UserRole,
}

/// Register or refresh a user profile.
///
/// Bootstrap route: it takes no caller identity so the first admin of an
/// organization can be provisioned.
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(request): Json<UpsertUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    if request.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    let user = UserProfile::new(
        request.email,
        request.display_name,
        request.organization_id,
        request.role,
    );
    state.store.upsert_user(user.clone()).await?;

    tracing::info!(user_id = %user.id, "registered user");

    Ok(Json(user))
}

/// Get a user profile; limited to the caller's own organization
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let caller = authenticated_user(&state, &headers).await?;

    let user = state
        .store
        .get_user(&UserId::new(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;

    if user.organization_id != caller.organization_id {
        return Err(ApiError::Forbidden(format!(
            "user {id} belongs to another organization"
        )));
    }

    Ok(Json(user))
}
