//! The signature workflow engine.
//!
//! All three operations run as one logical sequence per call, with the
//! attendee list as the single shared mutable resource. Mutations go
//! through full-list revision-checked writes; on a revision conflict the
//! engine re-reads and retries a bounded number of times.

use crate::error::{SigningError, SigningResult};
use crate::link::SigningLinks;
use crate::token::generate_signature_token;
use actas_notify::{NotificationSender, SignatureRequestEmail};
use actas_storage::{ActaStore, ActaUpdate, StorageError};
use actas_types::{
    Acta, ActaId, ActaStatus, Attendee, AttendeeId, SignatureStatus, UserId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Delivery outcome for a single attendee during request issuance.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResult {
    pub attendee_id: AttendeeId,
    pub email: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of `issue_requests`.
#[derive(Debug, Serialize)]
pub struct IssueOutcome {
    /// Number of successfully delivered notifications
    pub sent_count: usize,
    /// One entry per attempted attendee, in document order
    pub results: Vec<DeliveryResult>,
}

/// Attendee projection returned to the signing surface.
#[derive(Debug, Serialize)]
pub struct AttendeeSummary {
    pub id: AttendeeId,
    pub name: String,
    pub role: String,
    pub signature_status: SignatureStatus,
}

/// Acta projection returned to the signing surface.
#[derive(Debug, Serialize)]
pub struct ActaSummary {
    pub title: String,
    pub date: DateTime<Utc>,
}

/// Result of a successful token verification.
#[derive(Debug, Serialize)]
pub struct VerifyOutcome {
    pub valid: bool,
    pub attendee: AttendeeSummary,
    pub acta: ActaSummary,
}

/// Result of recording a signature.
#[derive(Debug, Serialize)]
pub struct RecordOutcome {
    /// True when this signature completed the full set
    pub all_signed: bool,
}

/// Orchestrates issuing signature requests, validating tokens, and
/// recording completed signatures.
pub struct SignatureWorkflow {
    store: Arc<dyn ActaStore>,
    notifier: Arc<dyn NotificationSender>,
    links: SigningLinks,
    max_update_attempts: usize,
}

impl SignatureWorkflow {
    pub fn new(
        store: Arc<dyn ActaStore>,
        notifier: Arc<dyn NotificationSender>,
        links: SigningLinks,
    ) -> Self {
        Self {
            store,
            notifier,
            links,
            max_update_attempts: 3,
        }
    }

    /// Bound on read-modify-write retries under revision conflicts.
    pub fn with_max_update_attempts(mut self, attempts: usize) -> Self {
        self.max_update_attempts = attempts.max(1);
        self
    }

    /// Issue signature requests to outstanding attendees.
    ///
    /// `attendee_ids`, when given, narrows the candidate set; unknown ids
    /// match nothing and are not an error. An empty candidate set is a
    /// successful no-op. Individual delivery failures do not abort the
    /// operation; tokens are persisted for every attempted attendee in a
    /// single update.
    pub async fn issue_requests(
        &self,
        acta_id: &ActaId,
        requester: Option<&UserId>,
        attendee_ids: Option<&[AttendeeId]>,
    ) -> SigningResult<IssueOutcome> {
        let requester_id = requester.ok_or(SigningError::Unauthenticated)?;
        if acta_id.is_empty() {
            return Err(SigningError::InvalidArgument(
                "acta id is required".to_string(),
            ));
        }

        let acta = self
            .store
            .get_acta(acta_id)
            .await?
            .ok_or_else(|| SigningError::NotFound(format!("acta {acta_id} not found")))?;

        // An identity without a stored profile is a rights problem, not
        // a missing-credential one.
        let requester = self.store.get_user(requester_id).await?.ok_or_else(|| {
            SigningError::PermissionDenied(format!("user {requester_id} has no profile"))
        })?;

        if requester.organization_id != acta.organization_id {
            return Err(SigningError::PermissionDenied(format!(
                "user {} may not issue signature requests for acta {acta_id}",
                requester.id
            )));
        }

        let candidates: Vec<Attendee> = acta
            .pending_attendees()
            .filter(|a| attendee_ids.map_or(true, |ids| ids.contains(&a.id)))
            .cloned()
            .collect();

        if candidates.is_empty() {
            return Ok(IssueOutcome {
                sent_count: 0,
                results: Vec::new(),
            });
        }

        let meeting_title = acta.meeting_info.title.clone();
        let meeting_date = acta.meeting_info.date.format("%Y-%m-%d").to_string();

        let mut tokens: HashMap<AttendeeId, String> = HashMap::new();
        let mut results = Vec::with_capacity(candidates.len());

        for attendee in &candidates {
            let token = generate_signature_token();
            let signing_url = self.links.signing_url(acta_id, &attendee.id, &token);
            tokens.insert(attendee.id.clone(), token);

            let message = SignatureRequestEmail::new(
                &attendee.name,
                &attendee.role,
                &meeting_title,
                &meeting_date,
                &signing_url,
            )
            .into_message(attendee.email.clone());

            match self.notifier.send(&message).await {
                Ok(()) => results.push(DeliveryResult {
                    attendee_id: attendee.id.clone(),
                    email: attendee.email.clone(),
                    delivered: true,
                    error: None,
                }),
                Err(err) => {
                    tracing::warn!(
                        acta_id = %acta_id,
                        attendee_id = %attendee.id,
                        error = %err,
                        "signature request delivery failed"
                    );
                    results.push(DeliveryResult {
                        attendee_id: attendee.id.clone(),
                        email: attendee.email.clone(),
                        delivered: false,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        // Tokens are persisted even where delivery failed: the new token
        // has already invalidated any previously mailed link.
        self.persist_tokens(acta_id, acta, &tokens).await?;

        let sent_count = results.iter().filter(|r| r.delivered).count();
        tracing::info!(
            acta_id = %acta_id,
            sent_count,
            attempted = results.len(),
            "issued signature requests"
        );
        Ok(IssueOutcome { sent_count, results })
    }

    /// Read-only token check, used by the signing page before rendering.
    pub async fn verify_token(
        &self,
        acta_id: &ActaId,
        attendee_id: &AttendeeId,
        token: &str,
    ) -> SigningResult<VerifyOutcome> {
        if acta_id.is_empty() || attendee_id.is_empty() || token.is_empty() {
            return Err(SigningError::InvalidArgument(
                "acta id, attendee id and token are required".to_string(),
            ));
        }

        let acta = self
            .store
            .get_acta(acta_id)
            .await?
            .ok_or_else(|| SigningError::NotFound(format!("acta {acta_id} not found")))?;

        let attendee = acta
            .attendee(attendee_id)
            .ok_or_else(|| SigningError::NotFound(format!("attendee {attendee_id} not found")))?;

        if attendee.signature_token.as_deref() != Some(token) {
            return Err(SigningError::PermissionDenied(
                "invalid signature token".to_string(),
            ));
        }

        Ok(VerifyOutcome {
            valid: true,
            attendee: AttendeeSummary {
                id: attendee.id.clone(),
                name: attendee.name.clone(),
                role: attendee.role.clone(),
                signature_status: attendee.signature_status,
            },
            acta: ActaSummary {
                title: acta.meeting_info.title.clone(),
                date: acta.meeting_info.date,
            },
        })
    }

    /// Record a completed signature and derive document completion.
    ///
    /// Requires a token match; recording twice for the same attendee is
    /// rejected with [`SigningError::AlreadySigned`] rather than treated
    /// as idempotent.
    pub async fn record_signature(
        &self,
        acta_id: &ActaId,
        attendee_id: &AttendeeId,
        token: &str,
        signature_url: &str,
    ) -> SigningResult<RecordOutcome> {
        if acta_id.is_empty() || attendee_id.is_empty() || token.is_empty() || signature_url.is_empty()
        {
            return Err(SigningError::InvalidArgument(
                "acta id, attendee id, token and signature url are required".to_string(),
            ));
        }

        for _attempt in 0..self.max_update_attempts {
            let mut acta = self
                .store
                .get_acta(acta_id)
                .await?
                .ok_or_else(|| SigningError::NotFound(format!("acta {acta_id} not found")))?;

            let attendee = acta.attendee_mut(attendee_id).ok_or_else(|| {
                SigningError::NotFound(format!("attendee {attendee_id} not found"))
            })?;

            if attendee.signature_token.as_deref() != Some(token) {
                return Err(SigningError::PermissionDenied(
                    "invalid signature token".to_string(),
                ));
            }

            if attendee.is_signed() {
                return Err(SigningError::AlreadySigned);
            }

            let signed_at = Utc::now();
            attendee.mark_signed(signature_url, signed_at);

            let all_signed = acta.all_signed();
            let update = ActaUpdate {
                attendees: Some(acta.attendees.clone()),
                status: Some(if all_signed {
                    ActaStatus::Completed
                } else {
                    ActaStatus::PendingSignatures
                }),
                completed_at: all_signed.then_some(signed_at),
                ..Default::default()
            };

            match self.store.update_acta(acta_id, update, acta.revision).await {
                Ok(()) => {
                    tracing::info!(
                        acta_id = %acta_id,
                        attendee_id = %attendee_id,
                        all_signed,
                        "signature recorded"
                    );
                    return Ok(RecordOutcome { all_signed });
                }
                // Someone else won the write; re-read and re-validate.
                Err(StorageError::Conflict(_)) => continue,
                Err(other) => return Err(other.into()),
            }
        }

        Err(SigningError::Internal(format!(
            "revision conflict persisted after {} attempts",
            self.max_update_attempts
        )))
    }

    async fn persist_tokens(
        &self,
        acta_id: &ActaId,
        first_read: Acta,
        tokens: &HashMap<AttendeeId, String>,
    ) -> SigningResult<()> {
        let mut acta = first_read;
        for attempt in 0..self.max_update_attempts {
            if attempt > 0 {
                acta = self
                    .store
                    .get_acta(acta_id)
                    .await?
                    .ok_or_else(|| SigningError::NotFound(format!("acta {acta_id} not found")))?;
            }

            let mut attendees = acta.attendees.clone();
            for attendee in attendees.iter_mut() {
                // An attendee who signed between read and write keeps
                // their state; the freshly minted token is discarded.
                if attendee.is_signed() {
                    continue;
                }
                if let Some(token) = tokens.get(&attendee.id) {
                    attendee.signature_token = Some(token.clone());
                }
            }

            // Every candidate signed between read and write: there is no
            // token left to store, and the document has already reached
            // Completed. Writing would regress its status.
            if attendees.iter().all(Attendee::is_signed) {
                return Ok(());
            }

            let update = ActaUpdate {
                attendees: Some(attendees),
                status: Some(ActaStatus::PendingSignatures),
                signature_requests_sent_at: Some(Utc::now()),
                ..Default::default()
            };

            match self.store.update_acta(acta_id, update, acta.revision).await {
                Ok(()) => return Ok(()),
                Err(StorageError::Conflict(_)) => continue,
                Err(other) => return Err(other.into()),
            }
        }

        Err(SigningError::Internal(format!(
            "revision conflict persisted after {} attempts",
            self.max_update_attempts
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actas_notify::RecordingNotifier;
    use actas_storage::memory::InMemoryActaStore;
    use actas_storage::{NewActa, QueryWindow};
    use actas_types::{
        Attendance, MeetingInfo, Modality, OrganizationId, UserProfile, UserRole,
    };

    struct Fixture {
        store: Arc<InMemoryActaStore>,
        notifier: Arc<RecordingNotifier>,
        workflow: SignatureWorkflow,
        requester: UserId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryActaStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let workflow = SignatureWorkflow::new(
            store.clone(),
            notifier.clone(),
            SigningLinks::new("https://actas.example"),
        );

        let user = UserProfile::new(
            "chair@example.org",
            "Chair",
            OrganizationId::new("org-1"),
            UserRole::Admin,
        );
        let requester = user.id.clone();
        store.upsert_user(user).await.unwrap();

        Fixture {
            store,
            notifier,
            workflow,
            requester,
        }
    }

    async fn seed_acta(fx: &Fixture, org: &str, names: &[&str]) -> (ActaId, Vec<AttendeeId>) {
        let attendees: Vec<Attendee> = names
            .iter()
            .map(|name| {
                Attendee::new(
                    *name,
                    format!("{}@example.org", name.to_lowercase()),
                    "Member",
                    Attendance::Present,
                )
            })
            .collect();
        let ids = attendees.iter().map(|a| a.id.clone()).collect();
        let acta_id = fx
            .store
            .create_acta(NewActa {
                organization_id: OrganizationId::new(org),
                created_by: fx.requester.clone(),
                meeting_info: MeetingInfo {
                    title: "Board meeting".to_string(),
                    date: Utc::now(),
                    start_time: "10:00".to_string(),
                    end_time: None,
                    location: "Room 4".to_string(),
                    modality: Modality::InPerson,
                },
                attendees,
                agenda: vec![],
                raw_content: String::new(),
                audio_url: None,
            })
            .await
            .unwrap();
        (acta_id, ids)
    }

    async fn token_of(fx: &Fixture, acta_id: &ActaId, attendee_id: &AttendeeId) -> String {
        fx.store
            .get_acta(acta_id)
            .await
            .unwrap()
            .unwrap()
            .attendee(attendee_id)
            .unwrap()
            .signature_token
            .clone()
            .expect("attendee has no outstanding token")
    }

    #[tokio::test]
    async fn full_signing_flow_completes_document() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana", "Ben"]).await;

        let outcome = fx
            .workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        assert_eq!(outcome.sent_count, 2);
        assert_eq!(fx.notifier.sent().len(), 2);

        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert_eq!(acta.status, ActaStatus::PendingSignatures);
        assert!(acta.signature_requests_sent_at.is_some());

        let token_a = token_of(&fx, &acta_id, &ids[0]).await;
        let first = fx
            .workflow
            .record_signature(&acta_id, &ids[0], &token_a, "url-a")
            .await
            .unwrap();
        assert!(!first.all_signed);

        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert_eq!(acta.status, ActaStatus::PendingSignatures);
        assert!(acta.completed_at.is_none());

        let token_b = token_of(&fx, &acta_id, &ids[1]).await;
        let second = fx
            .workflow
            .record_signature(&acta_id, &ids[1], &token_b, "url-b")
            .await
            .unwrap();
        assert!(second.all_signed);

        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert_eq!(acta.status, ActaStatus::Completed);
        assert!(acta.completed_at.is_some());
        let signed = acta.attendee(&ids[0]).unwrap();
        assert!(signed.is_signed());
        assert_eq!(signed.signature_url.as_deref(), Some("url-a"));
        assert!(signed.signed_at.is_some());

        // Recording twice is an error, and state stays signed.
        let repeat = fx
            .workflow
            .record_signature(&acta_id, &ids[0], &token_a, "url-a2")
            .await;
        assert!(matches!(repeat, Err(SigningError::AlreadySigned)));
        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert!(acta.attendee(&ids[0]).unwrap().is_signed());
        assert_eq!(
            acta.attendee(&ids[0]).unwrap().signature_url.as_deref(),
            Some("url-a")
        );
    }

    #[tokio::test]
    async fn issue_requires_requester_identity() {
        let fx = fixture().await;
        let (acta_id, _) = seed_acta(&fx, "org-1", &["Ana"]).await;

        // No identity at all: a credential problem.
        let result = fx.workflow.issue_requests(&acta_id, None, None).await;
        assert!(matches!(result, Err(SigningError::Unauthenticated)));

        // An identity with no stored profile: a rights problem.
        let unknown = UserId::new("ghost");
        let result = fx
            .workflow
            .issue_requests(&acta_id, Some(&unknown), None)
            .await;
        assert!(matches!(result, Err(SigningError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn issue_checks_document_existence_before_requester_profile() {
        let fx = fixture().await;

        let unknown = UserId::new("ghost");
        let result = fx
            .workflow
            .issue_requests(&ActaId::new("missing"), Some(&unknown), None)
            .await;
        assert!(matches!(result, Err(SigningError::NotFound(_))));
    }

    #[tokio::test]
    async fn issue_rejects_cross_organization_requester() {
        let fx = fixture().await;
        let (acta_id, _) = seed_acta(&fx, "org-2", &["Ana"]).await;

        let result = fx
            .workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await;
        assert!(matches!(result, Err(SigningError::PermissionDenied(_))));
        assert!(fx.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn issue_validates_inputs_and_existence() {
        let fx = fixture().await;

        let result = fx
            .workflow
            .issue_requests(&ActaId::new(""), Some(&fx.requester), None)
            .await;
        assert!(matches!(result, Err(SigningError::InvalidArgument(_))));

        let result = fx
            .workflow
            .issue_requests(&ActaId::new("missing"), Some(&fx.requester), None)
            .await;
        assert!(matches!(result, Err(SigningError::NotFound(_))));
    }

    #[tokio::test]
    async fn issue_with_only_signed_or_unknown_ids_is_a_no_op() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana"]).await;

        fx.workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        let token = token_of(&fx, &acta_id, &ids[0]).await;
        fx.workflow
            .record_signature(&acta_id, &ids[0], &token, "url")
            .await
            .unwrap();

        let before = fx.store.get_acta(&acta_id).await.unwrap().unwrap();

        // Only-signed filter: no candidates, no mutation.
        let outcome = fx
            .workflow
            .issue_requests(&acta_id, Some(&fx.requester), Some(ids.as_slice()))
            .await
            .unwrap();
        assert_eq!(outcome.sent_count, 0);
        assert!(outcome.results.is_empty());

        // Unknown ids match nothing and are not an error.
        let unknown = [AttendeeId::new("nope")];
        let outcome = fx
            .workflow
            .issue_requests(&acta_id, Some(&fx.requester), Some(&unknown[..]))
            .await
            .unwrap();
        assert_eq!(outcome.sent_count, 0);

        let after = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert_eq!(after.revision, before.revision);
        assert_eq!(after.status, before.status);
    }

    #[tokio::test]
    async fn issue_filter_narrows_candidates() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana", "Ben", "Eva"]).await;

        let filter = [ids[1].clone()];
        let outcome = fx
            .workflow
            .issue_requests(&acta_id, Some(&fx.requester), Some(&filter[..]))
            .await
            .unwrap();
        assert_eq!(outcome.sent_count, 1);
        assert_eq!(outcome.results[0].attendee_id, ids[1]);

        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert!(acta.attendee(&ids[0]).unwrap().signature_token.is_none());
        assert!(acta.attendee(&ids[1]).unwrap().signature_token.is_some());
        assert!(acta.attendee(&ids[2]).unwrap().signature_token.is_none());
    }

    #[tokio::test]
    async fn delivery_failure_for_one_does_not_block_others() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana", "Ben", "Eva"]).await;
        fx.notifier.fail_for("ben@example.org");

        let outcome = fx
            .workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        assert_eq!(outcome.sent_count, 2);
        assert_eq!(outcome.results.len(), 3);
        let failed = outcome
            .results
            .iter()
            .find(|r| r.attendee_id == ids[1])
            .unwrap();
        assert!(!failed.delivered);
        assert!(failed.error.is_some());

        // Every attempted attendee got a token, delivered or not.
        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        for id in &ids {
            assert!(acta.attendee(id).unwrap().signature_token.is_some());
        }
        assert_eq!(acta.status, ActaStatus::PendingSignatures);
    }

    #[tokio::test]
    async fn reissue_invalidates_previous_token() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana"]).await;

        fx.workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        let old_token = token_of(&fx, &acta_id, &ids[0]).await;

        fx.workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        let new_token = token_of(&fx, &acta_id, &ids[0]).await;
        assert_ne!(old_token, new_token);

        let result = fx
            .workflow
            .record_signature(&acta_id, &ids[0], &old_token, "url")
            .await;
        assert!(matches!(result, Err(SigningError::PermissionDenied(_))));

        fx.workflow
            .record_signature(&acta_id, &ids[0], &new_token, "url")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn verify_checks_token_without_mutating() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana"]).await;
        fx.workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        let token = token_of(&fx, &acta_id, &ids[0]).await;
        let revision_before = fx.store.get_acta(&acta_id).await.unwrap().unwrap().revision;

        let outcome = fx
            .workflow
            .verify_token(&acta_id, &ids[0], &token)
            .await
            .unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.attendee.name, "Ana");
        assert_eq!(outcome.attendee.signature_status, SignatureStatus::Pending);
        assert_eq!(outcome.acta.title, "Board meeting");

        let result = fx.workflow.verify_token(&acta_id, &ids[0], "wrong").await;
        assert!(matches!(result, Err(SigningError::PermissionDenied(_))));

        let result = fx
            .workflow
            .verify_token(&acta_id, &AttendeeId::new("nope"), &token)
            .await;
        assert!(matches!(result, Err(SigningError::NotFound(_))));

        let result = fx.workflow.verify_token(&acta_id, &ids[0], "").await;
        assert!(matches!(result, Err(SigningError::InvalidArgument(_))));

        let revision_after = fx.store.get_acta(&acta_id).await.unwrap().unwrap().revision;
        assert_eq!(revision_before, revision_after);
    }

    #[tokio::test]
    async fn record_requires_all_fields_and_a_matching_token() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana"]).await;
        fx.workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        let token = token_of(&fx, &acta_id, &ids[0]).await;

        let result = fx
            .workflow
            .record_signature(&acta_id, &ids[0], &token, "")
            .await;
        assert!(matches!(result, Err(SigningError::InvalidArgument(_))));

        let result = fx
            .workflow
            .record_signature(&acta_id, &ids[0], "wrong-token", "url")
            .await;
        assert!(matches!(result, Err(SigningError::PermissionDenied(_))));

        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert!(!acta.attendee(&ids[0]).unwrap().is_signed());
    }

    #[tokio::test]
    async fn record_on_missing_document_or_attendee_is_not_found() {
        let fx = fixture().await;
        let (acta_id, _) = seed_acta(&fx, "org-1", &["Ana"]).await;

        let result = fx
            .workflow
            .record_signature(&ActaId::new("missing"), &AttendeeId::new("x"), "t", "url")
            .await;
        assert!(matches!(result, Err(SigningError::NotFound(_))));

        let result = fx
            .workflow
            .record_signature(&acta_id, &AttendeeId::new("ghost"), "t", "url")
            .await;
        assert!(matches!(result, Err(SigningError::NotFound(_))));
    }

    /// Sender that signs the whole document mid-delivery, so the
    /// token-persist write lands on a moved revision of a Completed acta.
    struct SignDuringDelivery {
        store: Arc<InMemoryActaStore>,
        acta_id: ActaId,
    }

    #[async_trait::async_trait]
    impl actas_notify::NotificationSender for SignDuringDelivery {
        async fn send(
            &self,
            _message: &actas_notify::EmailMessage,
        ) -> Result<(), actas_notify::NotifyError> {
            let acta = self.store.get_acta(&self.acta_id).await.unwrap().unwrap();
            let signed_at = Utc::now();
            let mut attendees = acta.attendees.clone();
            for attendee in attendees.iter_mut() {
                attendee.mark_signed("url-mid-delivery", signed_at);
            }
            let update = ActaUpdate {
                attendees: Some(attendees),
                status: Some(ActaStatus::Completed),
                completed_at: Some(signed_at),
                ..Default::default()
            };
            self.store
                .update_acta(&self.acta_id, update, acta.revision)
                .await
                .unwrap();
            Ok(())
        }
    }

    #[tokio::test]
    async fn completion_during_delivery_is_not_regressed_by_token_persist() {
        let fx = fixture().await;
        let (acta_id, _) = seed_acta(&fx, "org-1", &["Ana"]).await;

        let signing_notifier = Arc::new(SignDuringDelivery {
            store: fx.store.clone(),
            acta_id: acta_id.clone(),
        });
        let workflow = SignatureWorkflow::new(
            fx.store.clone(),
            signing_notifier,
            SigningLinks::new("https://actas.example"),
        );

        workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();

        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert_eq!(acta.status, ActaStatus::Completed);
        assert!(acta.completed_at.is_some());
        assert!(acta.all_signed());
    }

    #[tokio::test]
    async fn concurrent_style_interleaving_preserves_both_signatures() {
        let fx = fixture().await;
        let (acta_id, ids) = seed_acta(&fx, "org-1", &["Ana", "Ben"]).await;
        fx.workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();
        let token_a = token_of(&fx, &acta_id, &ids[0]).await;
        let token_b = token_of(&fx, &acta_id, &ids[1]).await;

        // Both signers race on the same document; the revision check plus
        // bounded retry means neither write is lost.
        let (ra, rb) = tokio::join!(
            fx.workflow.record_signature(&acta_id, &ids[0], &token_a, "url-a"),
            fx.workflow.record_signature(&acta_id, &ids[1], &token_b, "url-b"),
        );
        ra.unwrap();
        rb.unwrap();

        let acta = fx.store.get_acta(&acta_id).await.unwrap().unwrap();
        assert!(acta.all_signed());
        assert_eq!(acta.status, ActaStatus::Completed);
    }

    #[tokio::test]
    async fn issue_results_are_listed_for_the_right_organization() {
        let fx = fixture().await;
        let (acta_id, _) = seed_acta(&fx, "org-1", &["Ana"]).await;
        fx.workflow
            .issue_requests(&acta_id, Some(&fx.requester), None)
            .await
            .unwrap();

        let listed = fx
            .store
            .list_actas(&OrganizationId::new("org-1"), QueryWindow::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, ActaStatus::PendingSignatures);
    }
}
