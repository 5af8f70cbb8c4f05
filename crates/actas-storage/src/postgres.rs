//! PostgreSQL adapter for the acta store.
//!
//! This adapter is the transactional source-of-truth backend. The attendee
//! list lives in a JSONB column and is always written as one field; the
//! revision column carries the optimistic-concurrency stamp, checked in the
//! UPDATE's WHERE clause.

use crate::model::{ActaUpdate, NewActa};
use crate::traits::{ActaStore, QueryWindow};
use crate::{StorageError, StorageResult};
use actas_types::{
    Acta, ActaId, ActaStatus, OrganizationId, UserId, UserProfile, UserRole,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

/// PostgreSQL-backed acta storage adapter.
#[derive(Clone)]
pub struct PostgresActaStore {
    pool: PgPool,
}

impl PostgresActaStore {
    /// Connect to PostgreSQL and initialize required schema.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        Self::connect_with_options(database_url, 10, 5).await
    }

    /// Connect with explicit pool parameters.
    pub async fn connect_with_options(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to connect postgres: {e}")))?;
        Self::from_pool(pool).await
    }

    /// Create adapter from an existing pool, initializing the schema.
    pub async fn from_pool(pool: PgPool) -> StorageResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> StorageResult<()> {
        let ddl = [
            r#"
            CREATE TABLE IF NOT EXISTS actas (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                created_by TEXT NOT NULL,
                status TEXT NOT NULL,
                meeting_info JSONB NOT NULL,
                attendees JSONB NOT NULL,
                agenda JSONB NOT NULL,
                raw_content TEXT NOT NULL,
                audio_url TEXT,
                pdf_url TEXT,
                generated_content JSONB,
                revision BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                completed_at TIMESTAMPTZ,
                signature_requests_sent_at TIMESTAMPTZ
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS actas_organization_created_idx
                ON actas (organization_id, created_at DESC)
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS acta_users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                display_name TEXT NOT NULL,
                organization_id TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        ];

        for stmt in ddl {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::Backend(format!("schema init failed: {e}")))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ActaStore for PostgresActaStore {
    async fn create_acta(&self, acta: NewActa) -> StorageResult<ActaId> {
        let id = ActaId::generate();
        let now = Utc::now();
        let meeting_info = serde_json::to_value(&acta.meeting_info)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let attendees = serde_json::to_value(&acta.attendees)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let agenda = serde_json::to_value(&acta.agenda)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO actas
                (id, organization_id, created_by, status, meeting_info, attendees,
                 agenda, raw_content, audio_url, revision, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 1, $10, $10)
            "#,
        )
        .bind(id.as_str())
        .bind(acta.organization_id.as_str())
        .bind(acta.created_by.as_str())
        .bind(status_to_str(ActaStatus::Draft))
        .bind(meeting_info)
        .bind(attendees)
        .bind(agenda)
        .bind(&acta.raw_content)
        .bind(&acta.audio_url)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(id)
    }

    async fn get_acta(&self, id: &ActaId) -> StorageResult<Option<Acta>> {
        let row = sqlx::query("SELECT * FROM actas WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        row.map(row_to_acta).transpose()
    }

    async fn update_acta(
        &self,
        id: &ActaId,
        update: ActaUpdate,
        expected_revision: u64,
    ) -> StorageResult<()> {
        let status = update.status.map(status_to_str);
        let meeting_info = update
            .meeting_info
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let attendees = update
            .attendees
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let agenda = update
            .agenda
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let generated_content = update
            .generated_content
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE actas
               SET status = COALESCE($1, status),
                   meeting_info = COALESCE($2, meeting_info),
                   attendees = COALESCE($3, attendees),
                   agenda = COALESCE($4, agenda),
                   raw_content = COALESCE($5, raw_content),
                   audio_url = COALESCE($6, audio_url),
                   pdf_url = COALESCE($7, pdf_url),
                   generated_content = COALESCE($8, generated_content),
                   completed_at = COALESCE($9, completed_at),
                   signature_requests_sent_at = COALESCE($10, signature_requests_sent_at),
                   revision = revision + 1,
                   updated_at = $11
             WHERE id = $12
               AND revision = $13
            "#,
        )
        .bind(status)
        .bind(meeting_info)
        .bind(attendees)
        .bind(agenda)
        .bind(&update.raw_content)
        .bind(&update.audio_url)
        .bind(&update.pdf_url)
        .bind(generated_content)
        .bind(update.completed_at)
        .bind(update.signature_requests_sent_at)
        .bind(Utc::now())
        .bind(id.as_str())
        .bind(expected_revision as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            let exists = self.get_acta(id).await?.is_some();
            if exists {
                return Err(StorageError::Conflict(format!(
                    "acta {id}: revision {expected_revision} is stale"
                )));
            }
            return Err(StorageError::NotFound(format!("acta {id} not found")));
        }

        Ok(())
    }

    async fn list_actas(
        &self,
        organization_id: &OrganizationId,
        window: QueryWindow,
    ) -> StorageResult<Vec<Acta>> {
        let limit = if window.limit == 0 {
            i64::MAX
        } else {
            window.limit as i64
        };
        let rows = sqlx::query(
            r#"
            SELECT * FROM actas
             WHERE organization_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(organization_id.as_str())
        .bind(limit)
        .bind(window.offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter().map(row_to_acta).collect()
    }

    async fn get_user(&self, id: &UserId) -> StorageResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT * FROM acta_users WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        row.map(row_to_user).transpose()
    }

    async fn upsert_user(&self, user: UserProfile) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO acta_users (id, email, display_name, organization_id, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
               SET email = EXCLUDED.email,
                   display_name = EXCLUDED.display_name,
                   organization_id = EXCLUDED.organization_id,
                   role = EXCLUDED.role
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.organization_id.as_str())
        .bind(role_to_str(user.role))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }
}

fn row_to_acta(row: PgRow) -> StorageResult<Acta> {
    let status: String = get(&row, "status")?;
    let meeting_info: serde_json::Value = get(&row, "meeting_info")?;
    let attendees: serde_json::Value = get(&row, "attendees")?;
    let agenda: serde_json::Value = get(&row, "agenda")?;
    let generated_content: Option<serde_json::Value> = get(&row, "generated_content")?;
    let revision: i64 = get(&row, "revision")?;

    Ok(Acta {
        id: ActaId::new(get::<String>(&row, "id")?),
        organization_id: OrganizationId::new(get::<String>(&row, "organization_id")?),
        created_by: UserId::new(get::<String>(&row, "created_by")?),
        status: status_from_str(&status)?,
        meeting_info: serde_json::from_value(meeting_info)
            .map_err(|e| StorageError::Serialization(e.to_string()))?,
        attendees: serde_json::from_value(attendees)
            .map_err(|e| StorageError::Serialization(e.to_string()))?,
        agenda: serde_json::from_value(agenda)
            .map_err(|e| StorageError::Serialization(e.to_string()))?,
        raw_content: get(&row, "raw_content")?,
        audio_url: get(&row, "audio_url")?,
        pdf_url: get(&row, "pdf_url")?,
        generated_content: generated_content
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| StorageError::Serialization(e.to_string()))?,
        revision: revision as u64,
        created_at: get(&row, "created_at")?,
        updated_at: get(&row, "updated_at")?,
        completed_at: get(&row, "completed_at")?,
        signature_requests_sent_at: get(&row, "signature_requests_sent_at")?,
    })
}

fn row_to_user(row: PgRow) -> StorageResult<UserProfile> {
    let role: String = get(&row, "role")?;
    Ok(UserProfile {
        id: UserId::new(get::<String>(&row, "id")?),
        email: get(&row, "email")?,
        display_name: get(&row, "display_name")?,
        organization_id: OrganizationId::new(get::<String>(&row, "organization_id")?),
        role: role_from_str(&role)?,
        created_at: get(&row, "created_at")?,
    })
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> StorageResult<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StorageError::Backend(format!("column {column}: {e}")))
}

fn status_to_str(status: ActaStatus) -> &'static str {
    match status {
        ActaStatus::Draft => "draft",
        ActaStatus::PendingSignatures => "pending_signatures",
        ActaStatus::Completed => "completed",
    }
}

fn status_from_str(value: &str) -> StorageResult<ActaStatus> {
    match value {
        "draft" => Ok(ActaStatus::Draft),
        "pending_signatures" => Ok(ActaStatus::PendingSignatures),
        "completed" => Ok(ActaStatus::Completed),
        other => Err(StorageError::Serialization(format!(
            "unknown acta status: {other}"
        ))),
    }
}

fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "admin",
        UserRole::Member => "member",
    }
}

fn role_from_str(value: &str) -> StorageResult<UserRole> {
    match value {
        "admin" => Ok(UserRole::Admin),
        "member" => Ok(UserRole::Member),
        other => Err(StorageError::Serialization(format!(
            "unknown user role: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_roundtrip() {
        for status in [
            ActaStatus::Draft,
            ActaStatus::PendingSignatures,
            ActaStatus::Completed,
        ] {
            assert_eq!(status_from_str(status_to_str(status)).unwrap(), status);
        }
        assert!(status_from_str("archived").is_err());
    }
}
