use std::marker::PhantomData;
use std::sync::Arc;

use models::{errors::ModelError, Resource};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::backend::{BackendError, TableBackend};
use crate::errors::ServiceError;
use crate::filter::RowFilter;
use crate::pagination::{Page, Pagination};

/// CRUD over one backend table, typed by the record it holds.
pub struct ResourceService<R: Resource> {
    backend: Arc<dyn TableBackend>,
    table: String,
    _record: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self { backend: self.backend.clone(), table: self.table.clone(), _record: PhantomData }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn to_value<T: Serialize>(payload: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(payload).map_err(|e| ServiceError::Validation(e.to_string()))
}

fn log_failure(table: &str, op: &str, e: ServiceError) -> ServiceError {
    match &e {
        ServiceError::NotFound(_) | ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)) => {
            debug!(%table, op, error = %e, "rejected")
        }
        _ => error!(%table, op, error = %e, "failed"),
    }
    e
}

impl<R: Resource> ResourceService<R> {
    pub fn new(backend: Arc<dyn TableBackend>, table: impl Into<String>) -> Self {
        Self { backend, table: table.into(), _record: PhantomData }
    }

    pub fn table(&self) -> &str { &self.table }

    async fn fetch_rows(&self, filter: &RowFilter) -> Result<Vec<Value>, ServiceError> {
        let rows = self.backend.list_rows(&self.table).await?;
        Ok(filter.apply(rows))
    }

    fn decode_all(rows: Vec<Value>) -> Result<Vec<R>, ServiceError> {
        let records: Result<Vec<R>, _> = rows.into_iter().map(R::from_row).collect();
        Ok(records?)
    }

    async fn fetch_one(&self, id: &str) -> Result<R, ServiceError> {
        let row = self
            .backend
            .get_row(&self.table, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(R::KIND.label(), id))?;
        Ok(R::from_row(row)?)
    }

    async fn insert(&self, input: R::Input) -> Result<R, ServiceError> {
        R::validate_input(&input)?;
        let row = self.backend.create_row(&self.table, &new_id(), to_value(&input)?).await?;
        Ok(R::from_row(row)?)
    }

    async fn merge(&self, id: &str, patch: R::Patch) -> Result<R, ServiceError> {
        R::validate_patch(&patch)?;
        let data = to_value(&patch)?;
        if data.as_object().is_some_and(|m| m.is_empty()) {
            return self.fetch_one(id).await;
        }
        let row = match self.backend.update_row(&self.table, id, data).await {
            Ok(row) => row,
            Err(BackendError::NotFound) => return Err(ServiceError::not_found(R::KIND.label(), id)),
            Err(e) => return Err(e.into()),
        };
        Ok(R::from_row(row)?)
    }

    /// Every matching record in backend order.
    #[instrument(skip(self, filter), fields(table = %self.table))]
    pub async fn list(&self, filter: &RowFilter) -> Result<Vec<R>, ServiceError> {
        let rows = self.fetch_rows(filter).await.map_err(|e| log_failure(&self.table, "list", e))?;
        let records = Self::decode_all(rows).map_err(|e| log_failure(&self.table, "list", e))?;
        debug!(count = records.len(), "listed");
        Ok(records)
    }

    /// One page of matching records. Only the rows on the page are decoded.
    #[instrument(skip(self, filter), fields(table = %self.table))]
    pub async fn list_page(&self, filter: &RowFilter, pagination: Pagination) -> Result<Page<R>, ServiceError> {
        let rows = self.fetch_rows(filter).await.map_err(|e| log_failure(&self.table, "list_page", e))?;
        let page = Page::from_items(&rows, pagination);
        let items = Self::decode_all(page.items).map_err(|e| log_failure(&self.table, "list_page", e))?;
        debug!(total = page.total, page = page.page, "listed page");
        Ok(Page { items, page: page.page, per_page: page.per_page, total: page.total, total_pages: page.total_pages })
    }

    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn get(&self, id: &str) -> Result<R, ServiceError> {
        self.fetch_one(id).await.map_err(|e| log_failure(&self.table, "get", e))
    }

    #[instrument(skip(self, input), fields(table = %self.table))]
    pub async fn create(&self, input: R::Input) -> Result<R, ServiceError> {
        let record = self.insert(input).await.map_err(|e| log_failure(&self.table, "create", e))?;
        info!(id = %record.id(), "created");
        Ok(record)
    }

    /// Partial update. A patch with no fields set returns the stored record unchanged.
    #[instrument(skip(self, patch), fields(table = %self.table))]
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R, ServiceError> {
        let record = self.merge(id, patch).await.map_err(|e| log_failure(&self.table, "update", e))?;
        info!("updated");
        Ok(record)
    }

    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let existed = self
            .backend
            .delete_row(&self.table, id)
            .await
            .map_err(|e| log_failure(&self.table, "delete", e.into()))?;
        if !existed {
            return Err(log_failure(&self.table, "delete", ServiceError::not_found(R::KIND.label(), id)));
        }
        info!("deleted");
        Ok(())
    }
}
