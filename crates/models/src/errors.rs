use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl ModelError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        Self::Validation(format!("{field} {reason}"))
    }
}
