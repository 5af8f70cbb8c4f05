//! Requester identity
//!
//! The external auth provider is out of scope; the service only needs a
//! resolvable identity carrying the organization used for authorization.

use crate::ids::{OrganizationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Member,
}

/// A registered user of the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub organization_id: OrganizationId,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(
        email: impl Into<String>,
        display_name: impl Into<String>,
        organization_id: OrganizationId,
        role: UserRole,
    ) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            display_name: display_name.into(),
            organization_id,
            role,
            created_at: Utc::now(),
        }
    }
}
