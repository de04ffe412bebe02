use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use kudos_core::api::HttpAuthApi;
use kudos_core::deletion::HttpKudoRepository;
use kudos_core::models::RegisterRequest;
use kudos_core::{
    AuthSession, AuthorizedClient, Config, GenericDeletion, PermissionEvaluator, RoleHierarchy,
    SessionStore, TracingAuditSink,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "kudos session tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and persist the session locally
    Login { email: String, password: String },
    /// Create an account (does not log you in)
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Show the identity of the persisted session, if any
    Whoami,
    /// End the session and clear persisted state
    Logout,
    /// Delete a kudo card through the authorized deletion workflow
    DeleteKudo { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Try to load env from CWD; fall back to the crate-local `.env` when the
    // binary runs from elsewhere.
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;

    let store = SessionStore::new(&config.state_dir).with_cookie_max_age(config.cookie_max_age);
    let api = Arc::new(HttpAuthApi::new(config.api_url.clone()));
    let session = Arc::new(AuthSession::new(
        api,
        store,
        PermissionEvaluator::new(RoleHierarchy::standard()),
    ));
    session.restore().await;

    match cli.command {
        Commands::Login { email, password } => {
            let identity = session.login(&email, &password).await?;
            println!("Logged in as {} <{}>", identity.display_name, identity.email);
        }
        Commands::Register { name, email, password } => {
            let identity = session
                .register(RegisterRequest { name, email, password })
                .await?;
            println!(
                "Registered {} <{}>; run `kudos login` to start a session",
                identity.display_name, identity.email
            );
        }
        Commands::Whoami => match session.current_identity().await {
            Some(identity) => println!(
                "{} <{}> role={} team={}",
                identity.display_name,
                identity.email,
                identity.role,
                identity.team.as_deref().unwrap_or("-")
            ),
            None => println!("Not logged in"),
        },
        Commands::Logout => {
            session.logout().await;
            println!("Logged out");
        }
        Commands::DeleteKudo { id } => {
            let client = AuthorizedClient::new(session.clone(), config.api_url.clone());
            let repository = Arc::new(HttpKudoRepository::new(client));
            let deletion = GenericDeletion::new(session, repository)
                .with_audit(Arc::new(TracingAuditSink));
            deletion.execute(&id).await?;
            println!("Deleted kudo {id}");
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
