//! Uploaded documents (logos, artwork proofs, signed invoices).

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::backend::{StorageBackend, StoredFile};
use crate::errors::ServiceError;

const MAX_NAME_LEN: usize = 255;
const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Clone)]
pub struct FileService {
    storage: Arc<dyn StorageBackend>,
}

/// Keep the last path segment and drop control characters.
fn clean_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    base.chars().filter(|c| !c.is_control()).take(MAX_NAME_LEN).collect::<String>().trim().to_string()
}

impl FileService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self { Self { storage } }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, name: &str, mime_type: Option<&str>, bytes: Vec<u8>) -> Result<StoredFile, ServiceError> {
        let name = clean_name(name);
        if name.is_empty() || name == "." || name == ".." {
            return Err(ServiceError::Validation("file name is required".into()));
        }
        if bytes.is_empty() {
            return Err(ServiceError::Validation("file is empty".into()));
        }
        let mime = mime_type.map(str::trim).filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MIME);
        let id = Uuid::new_v4().simple().to_string();
        let stored = self.storage.upload_file(&id, &name, mime, bytes).await?;
        info!(id = %stored.id, name = %stored.name, "file uploaded");
        Ok(stored)
    }

    pub async fn metadata(&self, id: &str) -> Result<StoredFile, ServiceError> {
        self.storage.get_file(id).await?.ok_or_else(|| ServiceError::not_found("file", id))
    }

    /// Metadata plus content.
    pub async fn download(&self, id: &str) -> Result<(StoredFile, Vec<u8>), ServiceError> {
        let meta = self.metadata(id).await?;
        let bytes = self.storage.download_file(id).await?.ok_or_else(|| ServiceError::not_found("file", id))?;
        Ok((meta, bytes))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.storage.delete_file(id).await? {
            return Err(ServiceError::not_found("file", id));
        }
        info!("file deleted");
        Ok(())
    }
}
