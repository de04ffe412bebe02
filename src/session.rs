//! The authentication state machine.
//!
//! `Uninitialized -> Restoring -> {Authenticated | Unauthenticated}`, with
//! logout and 401 interception both returning to `Unauthenticated`. All
//! state mutation goes through one `tokio::sync::Mutex`, preserving the
//! single-writer-at-a-time property the surrounding UI event model provides
//! in the original client.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::AuthApi;
use crate::authz::{PermissionEvaluator, RoleRequirement};
use crate::errors::{AuthError, AuthResult};
use crate::events::{SessionEvent, SessionEvents};
use crate::models::{Identity, LoginRequest, RegisterRequest};
use crate::store::SessionStore;

const MIN_PASSWORD_LENGTH: usize = 6;
const MIN_NAME_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Uninitialized,
    Restoring,
    Authenticated { identity: Identity, token: String },
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

pub struct AuthSession {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
    evaluator: PermissionEvaluator,
    events: SessionEvents,
    state: Mutex<SessionState>,
}

impl AuthSession {
    pub fn new(api: Arc<dyn AuthApi>, store: SessionStore, evaluator: PermissionEvaluator) -> Self {
        Self {
            api,
            store,
            evaluator,
            events: SessionEvents::new(),
            state: Mutex::new(SessionState::Uninitialized),
        }
    }

    /// Lifecycle events (logout, forced invalidation) for the shell to
    /// react to; the session itself never navigates.
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Rebuild authentication state from the store. Runs once at startup.
    ///
    /// A persisted token is trusted without a verifying round trip; the
    /// first 401 proves it wrong and forces a logout. Never fails: storage
    /// trouble is contained by the store and lands here as "absent".
    pub async fn restore(&self) {
        let mut state = self.state.lock().await;
        *state = SessionState::Restoring;

        // The local store is the source of truth; the cookie surface only
        // mirrors the token for edge/middleware readers.
        let token = self.store.get_token();
        let identity = self.store.get_identity();

        *state = match (identity, token) {
            (Some(identity), Some(token)) => {
                tracing::debug!(user_id = %identity.id, "session restored from storage");
                SessionState::Authenticated { identity, token }
            }
            (identity, token) => {
                // Half-written state from an interrupted composite write;
                // wipe the stragglers so both surfaces agree again.
                if identity.is_some() || token.is_some() {
                    tracing::warn!("incomplete persisted session; clearing");
                    self.store.clear_all();
                }
                SessionState::Unauthenticated
            }
        };
    }

    /// Authenticate against the remote collaborator.
    ///
    /// On success the identity and token are persisted to both surfaces and
    /// the state flips to `Authenticated`. On failure the state is left
    /// untouched and the collaborator's message is surfaced verbatim.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Identity> {
        if !is_valid_email(email) {
            return Err(AuthError::validation("a valid email address is required"));
        }
        if password.is_empty() {
            return Err(AuthError::validation("password is required"));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await?;

        let mut state = self.state.lock().await;
        self.store.persist_session(&response.user, &response.token);
        *state = SessionState::Authenticated {
            identity: response.user.clone(),
            token: response.token,
        };

        tracing::info!(user_id = %response.user.id, "login succeeded");
        Ok(response.user)
    }

    /// Create an account. Deliberately does NOT authenticate the session;
    /// the caller logs in separately.
    pub async fn register(&self, data: RegisterRequest) -> AuthResult<Identity> {
        if !is_valid_email(&data.email) {
            return Err(AuthError::validation("a valid email address is required"));
        }
        if data.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if data.name.trim().len() < MIN_NAME_LENGTH {
            return Err(AuthError::validation(format!(
                "name must be at least {} characters",
                MIN_NAME_LENGTH
            )));
        }

        let response = self.api.register(&data).await?;
        Ok(response.user)
    }

    /// End the session. Server-side invalidation is best effort; local
    /// state is always cleared.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;

        let token = match &*state {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        };
        if let Err(err) = self.api.logout(token.as_deref()).await {
            tracing::warn!(error = %err, "server-side logout failed; clearing local session anyway");
        }

        self.store.clear_all();
        *state = SessionState::Unauthenticated;
        self.events.emit(SessionEvent::LoggedOut);
    }

    /// The 401 reaction: clear everything without a server round trip.
    ///
    /// Idempotent on purpose - two in-flight requests can both observe a
    /// 401 and race a user-initiated logout; every path converges here and
    /// clearing an already-empty store is a no-op.
    pub async fn force_logout(&self) {
        let mut state = self.state.lock().await;

        self.store.clear_all();
        if state.is_authenticated() {
            tracing::warn!("session invalidated by unauthorized response");
        }
        *state = SessionState::Unauthenticated;
        self.events.emit(SessionEvent::Invalidated);
    }

    /// False for every requirement shape unless the session is
    /// authenticated.
    pub async fn has_permission(&self, requirement: &RoleRequirement) -> bool {
        let state = self.state.lock().await;
        let role = match &*state {
            SessionState::Authenticated { identity, .. } => Some(identity.role),
            _ => None,
        };
        self.evaluator.evaluate(role, requirement)
    }

    /// Headers for outgoing calls: always a JSON content type, plus the
    /// bearer token when one is held.
    pub async fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let state = self.state.lock().await;
        if let SessionState::Authenticated { token, .. } = &*state {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "token is not a valid header value; sending without it");
                }
            }
        }
        headers
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_authenticated()
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        match &*self.state.lock().await {
            SessionState::Authenticated { identity, .. } => Some(identity.clone()),
            _ => None,
        }
    }

    pub async fn current_user_id(&self) -> Option<Uuid> {
        self.current_identity().await.map(|identity| identity.id)
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }
}

/// Shape check only: one `@`, a non-empty local part, a dotted domain.
/// The server owns real address validation.
fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
