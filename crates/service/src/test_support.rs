#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use crate::backend::LocalBackend;

/// A fresh directory under the system temp dir, unique per call.
pub fn temp_root() -> PathBuf {
    std::env::temp_dir().join(format!("servigraf_test_{}", uuid::Uuid::new_v4().simple()))
}

/// Local backend in a throwaway directory with one seeded login.
pub async fn local_backend() -> Result<Arc<LocalBackend>, anyhow::Error> {
    let backend = LocalBackend::open(temp_root()).await?;
    backend.add_account("admin@grafos.ec", "Admin", "offset-2024").await?;
    Ok(Arc::new(backend))
}

