//! In-memory reference implementation of the acta store.
//!
//! This adapter is deterministic and test-friendly, and doubles as the
//! local fallback backend when no database is configured. Production
//! deployments should use the PostgreSQL backend for source-of-truth data.

use crate::model::{ActaUpdate, NewActa};
use crate::traits::{ActaStore, QueryWindow};
use crate::{StorageError, StorageResult};
use actas_types::{Acta, ActaId, ActaStatus, OrganizationId, UserId, UserProfile};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory acta storage adapter.
#[derive(Default)]
pub struct InMemoryActaStore {
    actas: RwLock<HashMap<ActaId, Acta>>,
    users: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryActaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActaStore for InMemoryActaStore {
    async fn create_acta(&self, acta: NewActa) -> StorageResult<ActaId> {
        let mut guard = self
            .actas
            .write()
            .map_err(|_| StorageError::Backend("actas lock poisoned".to_string()))?;

        let now = Utc::now();
        let record = Acta {
            id: ActaId::generate(),
            organization_id: acta.organization_id,
            created_by: acta.created_by,
            status: ActaStatus::Draft,
            meeting_info: acta.meeting_info,
            attendees: acta.attendees,
            agenda: acta.agenda,
            raw_content: acta.raw_content,
            audio_url: acta.audio_url,
            pdf_url: None,
            generated_content: None,
            revision: 1,
            created_at: now,
            updated_at: now,
            completed_at: None,
            signature_requests_sent_at: None,
        };
        let id = record.id.clone();
        guard.insert(id.clone(), record);
        Ok(id)
    }

    async fn get_acta(&self, id: &ActaId) -> StorageResult<Option<Acta>> {
        let guard = self
            .actas
            .read()
            .map_err(|_| StorageError::Backend("actas lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn update_acta(
        &self,
        id: &ActaId,
        update: ActaUpdate,
        expected_revision: u64,
    ) -> StorageResult<()> {
        let mut guard = self
            .actas
            .write()
            .map_err(|_| StorageError::Backend("actas lock poisoned".to_string()))?;
        let record = guard
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("acta {id} not found")))?;

        if record.revision != expected_revision {
            return Err(StorageError::Conflict(format!(
                "acta {id}: expected revision {expected_revision}, found {}",
                record.revision
            )));
        }

        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(meeting_info) = update.meeting_info {
            record.meeting_info = meeting_info;
        }
        if let Some(attendees) = update.attendees {
            record.attendees = attendees;
        }
        if let Some(agenda) = update.agenda {
            record.agenda = agenda;
        }
        if let Some(raw_content) = update.raw_content {
            record.raw_content = raw_content;
        }
        if let Some(audio_url) = update.audio_url {
            record.audio_url = Some(audio_url);
        }
        if let Some(pdf_url) = update.pdf_url {
            record.pdf_url = Some(pdf_url);
        }
        if let Some(generated_content) = update.generated_content {
            record.generated_content = Some(generated_content);
        }
        if let Some(completed_at) = update.completed_at {
            record.completed_at = Some(completed_at);
        }
        if let Some(sent_at) = update.signature_requests_sent_at {
            record.signature_requests_sent_at = Some(sent_at);
        }

        record.revision += 1;
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn list_actas(
        &self,
        organization_id: &OrganizationId,
        window: QueryWindow,
    ) -> StorageResult<Vec<Acta>> {
        let guard = self
            .actas
            .read()
            .map_err(|_| StorageError::Backend("actas lock poisoned".to_string()))?;
        let mut values = guard
            .values()
            .filter(|a| &a.organization_id == organization_id)
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apply_window(values, window))
    }

    async fn get_user(&self, id: &UserId) -> StorageResult<Option<UserProfile>> {
        let guard = self
            .users
            .read()
            .map_err(|_| StorageError::Backend("users lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn upsert_user(&self, user: UserProfile) -> StorageResult<()> {
        let mut guard = self
            .users
            .write()
            .map_err(|_| StorageError::Backend("users lock poisoned".to_string()))?;
        guard.insert(user.id.clone(), user);
        Ok(())
    }
}

fn apply_window<T>(items: Vec<T>, window: QueryWindow) -> Vec<T> {
    let iter = items.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}
