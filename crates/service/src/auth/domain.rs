use serde::{Deserialize, Serialize};

use crate::backend::Account;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub account: Account,
    /// Session secret; sent back as cookie or bearer token.
    #[serde(skip)]
    pub secret: String,
    pub expire: String,
}
