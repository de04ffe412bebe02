use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tempfile::tempdir;
use uuid::Uuid;

use kudos_core::api::HttpAuthApi;
use kudos_core::deletion::HttpKudoRepository;
use kudos_core::{
    AuthError, AuthSession, AuthorizedClient, GenericDeletion, PermissionEvaluator, RoleHierarchy,
    SessionStore,
};

struct TestBackend {
    base_url: String,
    delete_calls: Arc<AtomicUsize>,
}

/// API double: one login principal, one kudo with a fixed owner.
async fn spawn_backend(login_user_id: Uuid, login_role: &str, kudo_owner: Uuid) -> Result<TestBackend> {
    let delete_calls = Arc::new(AtomicUsize::new(0));
    let calls = delete_calls.clone();
    let role = login_role.to_string();

    let router = Router::new()
        .route(
            "/auth/login",
            post(move || {
                let role = role.clone();
                async move {
                    Json(json!({
                        "token": "abc",
                        "user": {
                            "id": login_user_id,
                            "display_name": "Ada Lovelace",
                            "email": "ada@example.com",
                            "role": role,
                        }
                    }))
                }
            }),
        )
        .route(
            "/kudos/:id",
            get(move |Path(_id): Path<String>| async move {
                Json(json!({"owner_id": kudo_owner}))
            })
            .delete(move |Path(_id): Path<String>| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    StatusCode::NO_CONTENT
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(TestBackend {
        base_url: format!("http://{addr}"),
        delete_calls,
    })
}

async fn logged_in_deletion(backend: &TestBackend, dir: &std::path::Path) -> Result<GenericDeletion> {
    let session = Arc::new(AuthSession::new(
        Arc::new(HttpAuthApi::new(&backend.base_url)),
        SessionStore::new(dir),
        PermissionEvaluator::new(RoleHierarchy::standard()),
    ));
    session.restore().await;
    session.login("ada@example.com", "password").await?;

    let client = AuthorizedClient::new(session.clone(), backend.base_url.clone());
    let repository = Arc::new(HttpKudoRepository::new(client));
    Ok(GenericDeletion::new(session, repository))
}

#[tokio::test]
async fn owner_can_delete_their_own_kudo() -> Result<()> {
    let user_id = Uuid::new_v4();
    let backend = spawn_backend(user_id, "user", user_id).await?;
    let dir = tempdir()?;

    let deletion = logged_in_deletion(&backend, dir.path()).await?;
    deletion.execute("kudo-1").await?;

    assert_eq!(backend.delete_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn non_owner_without_elevation_is_denied() -> Result<()> {
    let backend = spawn_backend(Uuid::new_v4(), "user", Uuid::new_v4()).await?;
    let dir = tempdir()?;

    let deletion = logged_in_deletion(&backend, dir.path()).await?;
    let err = deletion.execute("kudo-1").await.unwrap_err();

    assert!(matches!(err, AuthError::Forbidden(_)));
    assert_eq!(err.to_string(), "no permission to delete this kudo");
    assert_eq!(backend.delete_calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn tech_lead_deletes_without_ownership() -> Result<()> {
    let backend = spawn_backend(Uuid::new_v4(), "tech_lead", Uuid::new_v4()).await?;
    let dir = tempdir()?;

    let deletion = logged_in_deletion(&backend, dir.path()).await?;
    deletion.execute("kudo-1").await?;

    assert_eq!(backend.delete_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn team_lead_is_not_elevated_for_deletion() -> Result<()> {
    let backend = spawn_backend(Uuid::new_v4(), "team_lead", Uuid::new_v4()).await?;
    let dir = tempdir()?;

    let deletion = logged_in_deletion(&backend, dir.path()).await?;
    let err = deletion.execute("kudo-1").await.unwrap_err();

    assert!(matches!(err, AuthError::Forbidden(_)));
    assert_eq!(backend.delete_calls.load(Ordering::SeqCst), 0);
    Ok(())
}
