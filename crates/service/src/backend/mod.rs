//! Remote backend-as-a-service seams.
//!
//! The ERP never owns its data: rows, sessions and files live in a BaaS.
//! `HttpBackend` talks to the hosted service; `LocalBackend` keeps the same
//! contract on local disk for development and tests.

pub mod http;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use http::HttpBackend;
pub use local::LocalBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("backend returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Schemaless tables keyed by a database-wide table id.
///
/// Rows are JSON objects carrying `$id`, `$createdAt` and `$updatedAt`.
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Every row of the table.
    async fn list_rows(&self, table: &str) -> Result<Vec<Value>, BackendError>;
    async fn get_row(&self, table: &str, id: &str) -> Result<Option<Value>, BackendError>;
    async fn create_row(&self, table: &str, id: &str, data: Value) -> Result<Value, BackendError>;
    /// Merge the top-level keys of `data` into the row.
    async fn update_row(&self, table: &str, id: &str, data: Value) -> Result<Value, BackendError>;
    async fn delete_row(&self, table: &str, id: &str) -> Result<bool, BackendError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub secret: String,
    /// RFC 3339 expiry.
    pub expire: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn create_session(&self, email: &str, password: &str) -> Result<Session, BackendError>;
    async fn delete_session(&self, secret: &str) -> Result<(), BackendError>;
    async fn get_account(&self, secret: &str) -> Result<Account, BackendError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size_original: u64,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn upload_file(&self, id: &str, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<StoredFile, BackendError>;
    async fn get_file(&self, id: &str) -> Result<Option<StoredFile>, BackendError>;
    async fn download_file(&self, id: &str) -> Result<Option<Vec<u8>>, BackendError>;
    async fn delete_file(&self, id: &str) -> Result<bool, BackendError>;
}

/// The three backend surfaces, usually served by one object.
#[derive(Clone)]
pub struct Backends {
    pub tables: Arc<dyn TableBackend>,
    pub sessions: Arc<dyn SessionBackend>,
    pub storage: Arc<dyn StorageBackend>,
}

impl Backends {
    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: TableBackend + SessionBackend + StorageBackend + 'static,
    {
        Self {
            tables: backend.clone(),
            sessions: backend.clone(),
            storage: backend,
        }
    }
}
