//! Signature workflow handlers

use super::auth::USER_HEADER;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use actas_signing::{IssueOutcome, RecordOutcome, VerifyOutcome};
use actas_types::{ActaId, AttendeeId, UserId};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

/// Send signature requests request body
#[derive(Debug, Default, Deserialize)]
pub struct SendSignatureRequestsRequest {
    /// When present, only these attendees are notified
    #[serde(default)]
    pub attendee_ids: Option<Vec<AttendeeId>>,
}

/// Verify token request body
#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub attendee_id: AttendeeId,
    pub token: String,
}

/// Record signature request body
#[derive(Debug, Deserialize)]
pub struct RecordSignatureRequest {
    pub attendee_id: AttendeeId,
    pub token: String,
    pub signature_url: String,
}

/// Issue signature request emails for an acta's pending attendees.
///
/// Requires an authenticated caller; the workflow enforces organization
/// ownership.
pub async fn send_signature_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<SendSignatureRequestsRequest>>,
) -> ApiResult<Json<IssueOutcome>> {
    let requester = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(UserId::new);

    let Json(request) = body.unwrap_or_default();
    let acta_id = ActaId::new(&id);

    let outcome = state
        .workflow
        .issue_requests(&acta_id, requester.as_ref(), request.attendee_ids.as_deref())
        .await?;

    Ok(Json(outcome))
}

/// Check a signing link's token before rendering the signing page.
///
/// Token holders are not logged-in users, so this route takes no caller
/// identity; the token itself is the credential.
pub async fn verify_signature_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<VerifyTokenRequest>,
) -> ApiResult<Json<VerifyOutcome>> {
    let acta_id = ActaId::new(&id);
    let outcome = state
        .workflow
        .verify_token(&acta_id, &request.attendee_id, &request.token)
        .await?;

    Ok(Json(outcome))
}

/// Record a completed signature

pub async fn record_signature(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RecordSignatureRequest>,
) -> ApiResult<Json<RecordOutcome>> {
    let acta_id = ActaId::new(&id);
    let outcome = state
        .workflow
        .record_signature(
            &acta_id,
            &request.attendee_id,
            &request.token,
            &request.signature_url,
        )
        .await?;

    Ok(Json(outcome))
}
