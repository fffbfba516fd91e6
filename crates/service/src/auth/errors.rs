use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not authenticated")]
    Unauthorized,
    #[error("login failed")]
    LoginFailed,
    #[error("backend error: {0}")]
    Backend(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Unauthorized => 1004,
            AuthError::LoginFailed => 1005,
            AuthError::Backend(_) => 1200,
        }
    }
}
