//! Session lifecycle events.
//!
//! The core never navigates; it announces that the session ended and lets
//! the shell react (redirect to the public entry point, tear down screens).
//! Sends are fire-and-forget: having no subscriber is not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Why the session transitioned to `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// User-initiated logout.
    LoggedOut,
    /// Forced logout after an unauthorized (401) response.
    Invalidated,
}

#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: SessionEvent) {
        // Fire and forget - an unobserved event must not break the session.
        let _ = self.sender.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// One record per committed deletion, handed to the audit sink.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub resource_id: String,
    pub user_id: Uuid,
    pub entity_type: &'static str,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(resource_id: impl Into<String>, user_id: Uuid, entity_type: &'static str) -> Self {
        Self {
            resource_id: resource_id.into(),
            user_id,
            entity_type,
            occurred_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_observe_emitted_events() {
        let events = SessionEvents::new();
        let mut rx = events.subscribe();

        events.emit(SessionEvent::Invalidated);
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::Invalidated);
    }

    #[test]
    fn emitting_without_subscribers_is_fine() {
        let events = SessionEvents::new();
        events.emit(SessionEvent::LoggedOut);
    }
}
