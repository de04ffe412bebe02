//! Generic authorize-then-mutate-then-audit template for destructive
//! operations.
//!
//! Every protected delete in the application (kudos, teams, pending
//! registrations) runs the same fixed sequence; only the repository behind
//! it differs. The audit step is deliberately best effort: once the delete
//! has committed, an audit failure is logged and swallowed rather than
//! rolled back.

mod kudo;

pub use kudo::HttpKudoRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AuthError, AuthResult};
use crate::events::AuditEntry;
use crate::session::AuthSession;

/// Entity-specific collaborator behind the generic workflow.
#[async_trait]
pub trait DeletionRepository: Send + Sync {
    /// Entity tag used in messages and audit records, e.g. "kudo".
    fn entity_type(&self) -> &'static str;

    /// Whether `user_id` may delete the resource. The common policy is
    /// "elevated role may delete anything; otherwise owner only".
    async fn can_delete(&self, id: &str, user_id: uuid::Uuid) -> AuthResult<bool>;

    async fn delete(&self, id: &str) -> AuthResult<()>;
}

/// Optional audit hook invoked after a committed deletion.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> AuthResult<()>;
}

/// Default sink: structured log line per deletion.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: &AuditEntry) -> AuthResult<()> {
        tracing::info!(
            entity_type = entry.entity_type,
            resource_id = %entry.resource_id,
            user_id = %entry.user_id,
            occurred_at = %entry.occurred_at,
            "resource deleted"
        );
        Ok(())
    }
}

pub struct GenericDeletion {
    session: Arc<AuthSession>,
    repository: Arc<dyn DeletionRepository>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl GenericDeletion {
    pub fn new(session: Arc<AuthSession>, repository: Arc<dyn DeletionRepository>) -> Self {
        Self {
            session,
            repository,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Fixed sequence: validate id, resolve the actor, check the predicate,
    /// delete, audit. Collaborator failures come back as typed errors; this
    /// method never panics on them.
    pub async fn execute(&self, id: &str) -> AuthResult<()> {
        if id.trim().is_empty() {
            return Err(AuthError::validation("id is required"));
        }

        let user_id = self
            .session
            .current_user_id()
            .await
            .ok_or_else(|| AuthError::authentication("not authenticated"))?;

        let allowed = self.repository.can_delete(id, user_id).await?;
        if !allowed {
            return Err(AuthError::forbidden(format!(
                "no permission to delete this {}",
                self.repository.entity_type()
            )));
        }

        self.repository.delete(id).await?;

        // Deletion has committed; the audit trail is best effort from here.
        if let Some(audit) = &self.audit {
            let entry = AuditEntry::new(id, user_id, self.repository.entity_type());
            if let Err(err) = audit.record(&entry).await {
                tracing::warn!(
                    entity_type = entry.entity_type,
                    resource_id = %entry.resource_id,
                    error = %err,
                    "audit hook failed after committed deletion"
                );
            }
        }

        Ok(())
    }
}
