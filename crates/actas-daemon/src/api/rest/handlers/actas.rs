//! Acta management handlers

use super::authenticated_user;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use actas_storage::{ActaUpdate, NewActa, QueryWindow};
use actas_types::{Acta, ActaId, Attendance, Attendee, AttendeeId, MeetingInfo};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

/// Descriptive attendee fields, the only ones callers may set.
///
/// Signature state (status, token, url, timestamp) is owned by the
/// workflow engine and never read from request bodies.
#[derive(Debug, Deserialize)]
pub struct AttendeeInput {
    /// Id of an existing attendee to update; absent for new attendees
    #[serde(default)]
    pub id: Option<AttendeeId>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub attendance: Attendance,
}

impl AttendeeInput {
    /// Merge into the stored list: a matching id keeps the stored
    /// signature state, anything else becomes a fresh pending attendee.
    fn apply(self, existing: &[Attendee]) -> Attendee {
        match self
            .id
            .as_ref()
            .and_then(|id| existing.iter().find(|a| &a.id == id))
        {
            Some(stored) => {
                let mut attendee = stored.clone();
                attendee.name = self.name;
                attendee.email = self.email;
                attendee.role = self.role;
                attendee.attendance = self.attendance;
                attendee
            }
            None => Attendee::new(self.name, self.email, self.role, self.attendance),
        }
    }
}

/// Create acta request
#[derive(Debug, Deserialize)]
pub struct CreateActaRequest {
    pub meeting_info: MeetingInfo,
    #[serde(default)]
    pub attendees: Vec<AttendeeInput>,
    #[serde(default)]
    pub agenda: Vec<String>,
    #[serde(default)]
    pub raw_content: String,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Create acta response
#[derive(Debug, Serialize)]
pub struct CreateActaResponse {
    pub id: ActaId,
}

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Update acta request, all fields optional
#[derive(Debug, Deserialize)]
pub struct UpdateActaRequest {
    /// Revision the caller read; the update is rejected when the stored
    /// document has moved past it
    pub revision: u64,
    #[serde(default)]
    pub meeting_info: Option<MeetingInfo>,
    #[serde(default)]
    pub attendees: Option<Vec<AttendeeInput>>,
    #[serde(default)]
    pub agenda: Option<Vec<String>>,
    #[serde(default)]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// Create a new acta owned by the caller's organization
pub async fn create_acta(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateActaRequest>,
) -> ApiResult<Json<CreateActaResponse>> {
    let user = authenticated_user(&state, &headers).await?;

    if request.meeting_info.title.trim().is_empty() {
        return Err(ApiError::BadRequest("meeting title is required".to_string()));
    }

    let id = state
        .store
        .create_acta(NewActa {
            organization_id: user.organization_id,
            created_by: user.id,
            meeting_info: request.meeting_info,
            attendees: request
                .attendees
                .into_iter()
                .map(|input| input.apply(&[]))
                .collect(),
            agenda: request.agenda,
            raw_content: request.raw_content,
            audio_url: request.audio_url,
        })
        .await?;

    tracing::info!(acta_id = %id, "created acta");

    Ok(Json(CreateActaResponse { id }))
}

/// Get a specific acta
pub async fn get_acta(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Acta>> {
    let user = authenticated_user(&state, &headers).await?;
    let acta_id = ActaId::new(&id);

    let acta = state
        .store
        .get_acta(&acta_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("acta {id} not found")))?;

    if acta.organization_id != user.organization_id {
        return Err(ApiError::Forbidden(format!(
            "acta {id} belongs to another organization"
        )));
    }

    Ok(Json(acta))
}

/// List actas for the caller's organization, newest first
pub async fn list_actas(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Acta>>> {
    let user = authenticated_user(&state, &headers).await?;

    // limit 0 means unbounded at the store level
    let window = QueryWindow {
        limit: params.limit.unwrap_or(0),
        offset: params.offset.unwrap_or(0),
    };
    let actas = state
        .store
        .list_actas(&user.organization_id, window)
        .await?;

    Ok(Json(actas))
}

/// Apply a partial update to an acta
pub async fn update_acta(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<UpdateActaRequest>,
) -> ApiResult<Json<Acta>> {
    let user = authenticated_user(&state, &headers).await?;
    let acta_id = ActaId::new(&id);

    let acta = state
        .store
        .get_acta(&acta_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("acta {id} not found")))?;

    if acta.organization_id != user.organization_id {
        return Err(ApiError::Forbidden(format!(
            "acta {id} belongs to another organization"
        )));
    }

    let attendees = request.attendees.map(|inputs| {
        inputs
            .into_iter()
            .map(|input| input.apply(&acta.attendees))
            .collect()
    });

    let update = ActaUpdate {
        meeting_info: request.meeting_info,
        attendees,
        agenda: request.agenda,
        raw_content: request.raw_content,
        audio_url: request.audio_url,
        pdf_url: request.pdf_url,
        ..Default::default()
    };
    if update.is_empty() {
        return Err(ApiError::BadRequest("no fields to update".to_string()));
    }

    state
        .store
        .update_acta(&acta_id, update, request.revision)
        .await?;

    let updated = state
        .store
        .get_acta(&acta_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("acta {id} not found")))?;

    tracing::info!(acta_id = %id, revision = updated.revision, "updated acta");

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rest::handlers::auth::USER_HEADER;
    use actas_notify::RecordingNotifier;
    use actas_signing::{SignatureWorkflow, SigningLinks};
    use actas_storage::memory::InMemoryActaStore;
    use actas_storage::ActaStore;
    use actas_types::{OrganizationId, SignatureStatus, UserProfile, UserRole};
    use axum::http::HeaderValue;
    use chrono::Utc;
    use std::sync::Arc;

    async fn test_state() -> (AppState, UserProfile) {
        let store: Arc<InMemoryActaStore> = Arc::new(InMemoryActaStore::new());
        let workflow = SignatureWorkflow::new(
            store.clone(),
            Arc::new(RecordingNotifier::new()),
            SigningLinks::new("https://actas.example"),
        );

        let user = UserProfile::new(
            "chair@example.org",
            "Chair",
            OrganizationId::new("org-1"),
            UserRole::Admin,
        );
        store.upsert_user(user.clone()).await.unwrap();

        (AppState::new(store, Arc::new(workflow)), user)
    }

    fn headers_for(user: &UserProfile) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_HEADER,
            HeaderValue::from_str(user.id.as_str()).unwrap(),
        );
        headers
    }

    fn meeting_json() -> serde_json::Value {
        serde_json::json!({
            "title": "Board meeting",
            "date": Utc::now(),
            "start_time": "10:00",
            "location": "Room 4",
            "modality": "in_person",
        })
    }

    #[tokio::test]
    async fn create_ignores_caller_supplied_signature_state() {
        let (state, user) = test_state().await;

        // The request baldly claims a signed attendee with its own token.
        let request: CreateActaRequest = serde_json::from_value(serde_json::json!({
            "meeting_info": meeting_json(),
            "attendees": [{
                "name": "Ana",
                "email": "ana@example.org",
                "role": "Member",
                "attendance": "present",
                "signature_status": "signed",
                "signature_token": "forged",
                "signature_url": "https://forged.example/sig.png",
            }],
        }))
        .unwrap();

        let Json(created) = create_acta(State(state.clone()), headers_for(&user), Json(request))
            .await
            .unwrap();

        let acta = state.store.get_acta(&created.id).await.unwrap().unwrap();
        let attendee = &acta.attendees[0];
        assert_eq!(attendee.signature_status, SignatureStatus::Pending);
        assert!(attendee.signature_token.is_none());
        assert!(attendee.signature_url.is_none());
        assert!(attendee.signed_at.is_none());
    }

    #[tokio::test]
    async fn patch_cannot_flip_an_attendee_to_signed() {
        let (state, user) = test_state().await;

        let request: CreateActaRequest = serde_json::from_value(serde_json::json!({
            "meeting_info": meeting_json(),
            "attendees": [{
                "name": "Ana",
                "email": "ana@example.org",
                "role": "Member",
                "attendance": "present",
            }],
        }))
        .unwrap();
        let Json(created) = create_acta(State(state.clone()), headers_for(&user), Json(request))
            .await
            .unwrap();
        let acta_id = created.id;

        // Outstanding token issued by the workflow engine.
        state
            .workflow
            .issue_requests(&acta_id, Some(&user.id), None)
            .await
            .unwrap();
        let before = state.store.get_acta(&acta_id).await.unwrap().unwrap();
        let attendee_id = before.attendees[0].id.clone();
        let token = before.attendees[0].signature_token.clone().unwrap();

        // PATCH claims the attendee signed; only descriptive fields land.
        let request: UpdateActaRequest = serde_json::from_value(serde_json::json!({
            "revision": before.revision,
            "attendees": [{
                "id": attendee_id,
                "name": "Ana",
                "email": "ana@example.org",
                "role": "Secretary",
                "attendance": "present",
                "signature_status": "signed",
                "signature_url": "https://forged.example/sig.png",
            }],
        }))
        .unwrap();

        let Json(updated) = update_acta(
            State(state.clone()),
            headers_for(&user),
            Path(acta_id.to_string()),
            Json(request),
        )
        .await
        .unwrap();

        let attendee = updated.attendee(&attendee_id).unwrap();
        assert_eq!(attendee.role, "Secretary");
        assert_eq!(attendee.signature_status, SignatureStatus::Pending);
        assert_eq!(attendee.signature_token.as_deref(), Some(token.as_str()));
        assert!(attendee.signature_url.is_none());
    }
}
