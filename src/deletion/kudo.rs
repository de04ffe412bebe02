use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use super::DeletionRepository;
use crate::client::AuthorizedClient;
use crate::errors::{AuthError, AuthResult};

/// Kudo deletion against the remote API: admin or tech_lead may delete any
/// card, everyone else only their own.
pub struct HttpKudoRepository {
    client: AuthorizedClient,
}

impl HttpKudoRepository {
    pub fn new(client: AuthorizedClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct KudoOwner {
    owner_id: Uuid,
}

#[async_trait]
impl DeletionRepository for HttpKudoRepository {
    fn entity_type(&self) -> &'static str {
        "kudo"
    }

    async fn can_delete(&self, id: &str, user_id: Uuid) -> AuthResult<bool> {
        if let Some(identity) = self.client.session().current_identity().await {
            if identity.role.is_elevated() {
                return Ok(true);
            }
        }

        let response = self.client.get(&format!("/kudos/{id}")).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AuthError::validation(format!("kudo {id} not found")));
        }
        if !response.status().is_success() {
            return Err(AuthError::internal(format!(
                "failed to load kudo {id}: status {}",
                response.status()
            )));
        }

        let kudo: KudoOwner = response.json().await?;
        Ok(kudo.owner_id == user_id)
    }

    async fn delete(&self, id: &str) -> AuthResult<()> {
        let response = self.client.delete(&format!("/kudos/{id}")).await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::FORBIDDEN => Err(AuthError::forbidden("no permission to delete this kudo")),
            status => Err(AuthError::internal(format!(
                "failed to delete kudo {id}: status {status}"
            ))),
        }
    }
}
