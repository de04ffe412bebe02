//! Remote collaborator boundary for authentication calls.
//!
//! The wire format belongs to the API layer; this module only owns the
//! contract: login/register hand back an identity plus an opaque token,
//! logout is best-effort server-side invalidation. Non-2xx responses are
//! translated into human-readable authentication errors.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{AuthError, AuthResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};

/// Fallback shown when a login rejection carries no message.
pub const LOGIN_FALLBACK: &str = "Invalid email or password";
/// Fallback shown when a registration rejection carries no message.
pub const REGISTER_FALLBACK: &str = "Registration failed";

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse>;
    async fn register(&self, request: &RegisterRequest) -> AuthResult<AuthResponse>;
    /// Invalidate server-side session state. Callers treat a failure here
    /// as non-fatal.
    async fn logout(&self, token: Option<&str>) -> AuthResult<()>;
}

/// reqwest-backed implementation against the kudos API.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Shape of the API's error payload. Tolerant: a missing or unparsable
/// body falls back to a fixed message.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn rejection_message(response: reqwest::Response, fallback: &str) -> String {
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody { message: Some(message) }) if !message.is_empty() => message,
        _ => fallback.to_string(),
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> AuthResult<AuthResponse> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = rejection_message(response, LOGIN_FALLBACK).await;
            return Err(AuthError::authentication(message));
        }

        Ok(response.json().await?)
    }

    async fn register(&self, request: &RegisterRequest) -> AuthResult<AuthResponse> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = rejection_message(response, REGISTER_FALLBACK).await;
            return Err(AuthError::authentication(message));
        }

        Ok(response.json().await?)
    }

    async fn logout(&self, token: Option<&str>) -> AuthResult<()> {
        let mut request = self.http.post(self.url("/auth/logout"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AuthError::authentication(format!(
                "logout rejected with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
