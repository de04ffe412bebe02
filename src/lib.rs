pub mod api;
pub mod authz;
pub mod client;
pub mod config;
pub mod deletion;
pub mod errors;
pub mod events;
pub mod models;
pub mod session;
pub mod store;

// Re-export the types most callers need
pub use authz::{PermissionEvaluator, RoleHierarchy, RoleRequirement};
pub use client::AuthorizedClient;
pub use config::Config;
pub use deletion::{AuditSink, DeletionRepository, GenericDeletion, TracingAuditSink};
pub use errors::{AuthError, AuthResult};
pub use events::{AuditEntry, SessionEvent, SessionEvents};
pub use models::{Identity, Role};
pub use session::{AuthSession, SessionState};
pub use store::SessionStore;
