pub type AuthResult<T> = Result<T, AuthError>;

/// Single error type for every public boundary in the session core.
///
/// Validation and authorization failures are recoverable and local; storage
/// failures are contained at the store boundary and normally never reach a
/// caller; `Transport` covers everything the HTTP collaborator can do wrong
/// except a 401, which is not an error value at all (it triggers the forced
/// logout instead).
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for failures the caller can fix and retry locally (bad input,
    /// missing permission) as opposed to collaborator or infrastructure
    /// trouble.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Forbidden(_))
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(value: std::io::Error) -> Self {
        Self::Storage(value.to_string())
    }
}
