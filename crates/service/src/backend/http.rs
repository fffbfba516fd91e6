use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use configs::BackendConfig;

use super::{Account, BackendError, Session, SessionBackend, StorageBackend, StoredFile, TableBackend};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SESSION_HEADER: &str = "X-Appwrite-Session";

/// Rows requested per list call while walking a whole table.
const PAGE_SIZE: usize = 100;

#[derive(Deserialize)]
struct DocumentList {
    total: u64,
    documents: Vec<Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Client for an Appwrite-style REST backend.
///
/// Table and storage calls authenticate with the project API key. Account
/// calls carry the user's session secret instead.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    bucket_id: String,
}

impl HttpBackend {
    pub fn new(cfg: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            project_id: cfg.project_id.clone(),
            api_key: cfg.api_key.clone(),
            database_id: cfg.database_id.clone(),
            bucket_id: cfg.bucket_id.clone(),
        })
    }

    fn documents_url(&self, table: &str) -> String {
        format!("{}/databases/{}/collections/{}/documents", self.endpoint, self.database_id, table)
    }

    fn files_url(&self) -> String {
        format!("{}/storage/buckets/{}/files", self.endpoint, self.bucket_id)
    }

    fn admin(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(PROJECT_HEADER, &self.project_id).header(KEY_HEADER, &self.api_key)
    }

    fn as_user(&self, req: RequestBuilder, secret: &str) -> RequestBuilder {
        req.header(PROJECT_HEADER, &self.project_id).header(SESSION_HEADER, secret)
    }

    async fn send(req: RequestBuilder) -> Result<Response, BackendError> {
        let resp = req.send().await.map_err(|e| BackendError::Network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ErrorBody>()
            .await
            .map(|b| b.message)
            .unwrap_or_default();
        debug!(status = status.as_u16(), %message, "backend request failed");
        Err(match status {
            StatusCode::NOT_FOUND => BackendError::NotFound,
            StatusCode::CONFLICT => BackendError::Conflict(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
            _ => BackendError::Http { status: status.as_u16(), message },
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
        resp.json::<T>().await.map_err(|e| BackendError::Decode(e.to_string()))
    }
}

fn not_found_as_none<T>(res: Result<T, BackendError>) -> Result<Option<T>, BackendError> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(BackendError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl TableBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn list_rows(&self, table: &str) -> Result<Vec<Value>, BackendError> {
        let url = self.documents_url(table);
        let mut rows: Vec<Value> = Vec::new();
        loop {
            let limit = json!({"method": "limit", "values": [PAGE_SIZE]}).to_string();
            let offset = json!({"method": "offset", "values": [rows.len()]}).to_string();
            let req = self
                .client
                .get(&url)
                .query(&[("queries[]", limit.as_str()), ("queries[]", offset.as_str())]);
            let page: DocumentList = Self::decode(Self::send(self.admin(req)).await?).await?;
            let fetched = page.documents.len();
            rows.extend(page.documents);
            debug!(fetched, collected = rows.len(), total = page.total, "fetched page");
            if fetched == 0 || rows.len() as u64 >= page.total {
                break;
            }
        }
        Ok(rows)
    }

    async fn get_row(&self, table: &str, id: &str) -> Result<Option<Value>, BackendError> {
        let req = self.client.get(format!("{}/{}", self.documents_url(table), id));
        let resp = not_found_as_none(Self::send(self.admin(req)).await)?;
        match resp {
            Some(resp) => Ok(Some(Self::decode(resp).await?)),
            None => Ok(None),
        }
    }

    async fn create_row(&self, table: &str, id: &str, data: Value) -> Result<Value, BackendError> {
        let body = json!({"documentId": id, "data": data});
        let req = self.client.post(self.documents_url(table)).json(&body);
        Self::decode(Self::send(self.admin(req)).await?).await
    }

    async fn update_row(&self, table: &str, id: &str, data: Value) -> Result<Value, BackendError> {
        let body = json!({"data": data});
        let req = self.client.patch(format!("{}/{}", self.documents_url(table), id)).json(&body);
        Self::decode(Self::send(self.admin(req)).await?).await
    }

    async fn delete_row(&self, table: &str, id: &str) -> Result<bool, BackendError> {
        let req = self.client.delete(format!("{}/{}", self.documents_url(table), id));
        Ok(not_found_as_none(Self::send(self.admin(req)).await)?.is_some())
    }
}

#[async_trait]
impl SessionBackend for HttpBackend {
    async fn create_session(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let req = self
            .client
            .post(format!("{}/account/sessions/email", self.endpoint))
            .json(&json!({"email": email, "password": password}));
        let session: Session = Self::decode(Self::send(self.admin(req)).await?).await?;
        if session.secret.is_empty() {
            warn!(session_id = %session.id, "backend returned a session without secret; is the API key missing?");
            return Err(BackendError::Decode("session secret missing".into()));
        }
        Ok(session)
    }

    async fn delete_session(&self, secret: &str) -> Result<(), BackendError> {
        let req = self.client.delete(format!("{}/account/sessions/current", self.endpoint));
        Self::send(self.as_user(req, secret)).await?;
        Ok(())
    }

    async fn get_account(&self, secret: &str) -> Result<Account, BackendError> {
        let req = self.client.get(format!("{}/account", self.endpoint));
        Self::decode(Self::send(self.as_user(req, secret)).await?).await
    }
}

#[async_trait]
impl StorageBackend for HttpBackend {
    async fn upload_file(&self, id: &str, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<StoredFile, BackendError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_str(mime_type)
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let form = multipart::Form::new().text("fileId", id.to_string()).part("file", part);
        let req = self.client.post(self.files_url()).multipart(form);
        Self::decode(Self::send(self.admin(req)).await?).await
    }

    async fn get_file(&self, id: &str) -> Result<Option<StoredFile>, BackendError> {
        let req = self.client.get(format!("{}/{}", self.files_url(), id));
        match not_found_as_none(Self::send(self.admin(req)).await)? {
            Some(resp) => Ok(Some(Self::decode(resp).await?)),
            None => Ok(None),
        }
    }

    async fn download_file(&self, id: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let req = self.client.get(format!("{}/{}/download", self.files_url(), id));
        match not_found_as_none(Self::send(self.admin(req)).await)? {
            Some(resp) => {
                let bytes = resp.bytes().await.map_err(|e| BackendError::Network(e.to_string()))?;
                Ok(Some(bytes.to_vec()))
            }
            None => Ok(None),
        }
    }

    async fn delete_file(&self, id: &str) -> Result<bool, BackendError> {
        let req = self.client.delete(format!("{}/{}", self.files_url(), id));
        Ok(not_found_as_none(Self::send(self.admin(req)).await)?.is_some())
    }
}
