//! Authenticated request dispatch with unauthorized-response recovery.
//!
//! Every call carries the session's current auth headers. A 401 from any
//! endpoint forces the session back to `Unauthenticated` before the
//! response is handed back; callers must not treat the response as usable
//! on that path.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde_json::Value;

use crate::errors::AuthResult;
use crate::session::AuthSession;

#[derive(Clone)]
pub struct AuthorizedClient {
    http: reqwest::Client,
    session: Arc<AuthSession>,
    base_url: String,
}

impl AuthorizedClient {
    pub fn new(session: Arc<AuthSession>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            session,
            base_url: base_url.into(),
        }
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Issue a request with the session's credential attached.
    ///
    /// On a 401 the session is force-logged-out synchronously before this
    /// returns; the (still-401) response comes back so the caller can see
    /// what happened, but its body carries no usable data.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> AuthResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .headers(self.session.auth_headers().await);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, %url, "unauthorized response; forcing logout");
            self.session.force_logout().await;
        }

        Ok(response)
    }

    pub async fn get(&self, path: &str) -> AuthResult<Response> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> AuthResult<Response> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> AuthResult<Response> {
        self.request(Method::DELETE, path, None).await
    }
}
