use std::sync::Arc;

use configs::TablesConfig;
use models::Resource;
use service::{auth::AuthService, backend::Backends, files::FileService, ResourceService};

/// Shared handler state. Cheap to clone; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub backends: Backends,
    pub tables: Arc<TablesConfig>,
    pub auth: AuthService,
    pub files: FileService,
}

impl AppState {
    pub fn new(backends: Backends, tables: TablesConfig) -> Self {
        Self {
            auth: AuthService::new(backends.sessions.clone()),
            files: FileService::new(backends.storage.clone()),
            tables: Arc::new(tables),
            backends,
        }
    }

    /// CRUD service for `R`, bound to its configured table.
    pub fn service<R: Resource>(&self) -> ResourceService<R> {
        let slug = R::KIND.slug();
        let table = self.tables.get(slug).unwrap_or(slug);
        ResourceService::new(self.backends.tables.clone(), table)
    }
}
