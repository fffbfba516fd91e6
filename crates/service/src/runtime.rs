//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` plus backend selection, so binary
//! crates only need `service::runtime`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use configs::{BackendConfig, BackendKind};
use tracing::{info, warn};

use crate::backend::{Backends, BackendError, HttpBackend, LocalBackend};

/// Ensure expected directories exist; warn on missing optional ones.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(frontend_dir, data_dir).await
}

/// Build the configured backend. The local backend lives under `data_dir`
/// and gets its accounts from config.
pub async fn connect(cfg: &BackendConfig, data_dir: &str) -> anyhow::Result<Backends> {
    match cfg.kind {
        BackendKind::Http => {
            let backend = HttpBackend::new(cfg).context("build http backend")?;
            info!(endpoint = %cfg.endpoint, project = %cfg.project_id, "using http backend");
            Ok(Backends::from_shared(Arc::new(backend)))
        }
        BackendKind::Local => {
            let root = Path::new(data_dir).join("backend");
            let backend = LocalBackend::open(&root).await.context("open local backend")?;
            if cfg.accounts.is_empty() {
                warn!("local backend has no accounts configured; nobody can log in");
            }
            for account in &cfg.accounts {
                match backend.add_account(&account.email, &account.name, &account.password).await {
                    Ok(_) | Err(BackendError::Conflict(_)) => {}
                    Err(e) => return Err(e).context("seed local account"),
                }
            }
            info!(root = %root.display(), accounts = cfg.accounts.len(), "using local backend");
            Ok(Backends::from_shared(Arc::new(backend)))
        }
    }
}
