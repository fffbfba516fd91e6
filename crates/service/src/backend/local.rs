use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{Account, BackendError, Session, SessionBackend, StorageBackend, StoredFile, TableBackend};
use crate::storage::json_map_store::JsonMapStore;

type RowStore = JsonMapStore<String, Value>;

const SESSION_HOURS: i64 = 12;
const SECRET_LEN: usize = 64;

struct LocalAccount {
    account: Account,
    password_hash: String,
}

/// File-persisted stand-in for the hosted backend.
///
/// Layout under `root`:
/// - `tables/{table}.json`: one map of `$id -> row` per table
/// - `files/{id}`: uploaded bytes, with metadata in `files.json`
///
/// Accounts and sessions are memory-only; accounts are seeded at startup.
pub struct LocalBackend {
    root: PathBuf,
    tables: Mutex<HashMap<String, Arc<RowStore>>>,
    accounts: RwLock<HashMap<String, LocalAccount>>,
    sessions: RwLock<HashMap<String, Session>>,
    files: Arc<JsonMapStore<String, StoredFile>>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Table ids become file names.
fn check_name(kind: &str, name: &str) -> Result<(), BackendError> {
    let ok = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !ok {
        return Err(BackendError::Http { status: 400, message: format!("invalid {kind} id: {name:?}") });
    }
    Ok(())
}

/// Copy user fields from `data`, dropping backend-owned `$` keys.
fn user_fields(data: Value) -> Result<Map<String, Value>, BackendError> {
    match data {
        Value::Object(map) => Ok(map.into_iter().filter(|(k, _)| !k.starts_with('$')).collect()),
        other => Err(BackendError::Decode(format!("row data must be an object, got {other}"))),
    }
}

fn created_at(row: &Value) -> &str {
    row.get("$createdAt").and_then(Value::as_str).unwrap_or_default()
}

/// An unparsable expiry counts as expired.
fn is_expired(session: &Session) -> bool {
    DateTime::parse_from_rfc3339(&session.expire).map_or(true, |expire| expire <= Utc::now())
}

fn row_id(row: &Value) -> &str {
    row.get("$id").and_then(Value::as_str).unwrap_or_default()
}

impl LocalBackend {
    pub async fn open<P: Into<PathBuf>>(root: P) -> Result<Self, BackendError> {
        let root = root.into();
        let files = JsonMapStore::new(root.join("files.json")).await?;
        tokio::fs::create_dir_all(root.join("files"))
            .await
            .map_err(|e| BackendError::Io(e.to_string()))?;
        info!(root = %root.display(), "local backend opened");
        Ok(Self {
            root,
            tables: Mutex::new(HashMap::new()),
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            files,
        })
    }

    async fn table(&self, table: &str) -> Result<Arc<RowStore>, BackendError> {
        check_name("table", table)?;
        let mut tables = self.tables.lock().await;
        if let Some(store) = tables.get(table) {
            return Ok(store.clone());
        }
        let store = JsonMapStore::new(self.root.join("tables").join(format!("{table}.json"))).await?;
        tables.insert(table.to_string(), store.clone());
        Ok(store)
    }

    /// Register a login. Emails are unique, compared case-insensitively.
    pub async fn add_account(&self, email: &str, name: &str, password: &str) -> Result<Account, BackendError> {
        let key = email.trim().to_lowercase();
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| BackendError::Io(e.to_string()))?
            .to_string();

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(BackendError::Conflict(format!("account {key} already exists")));
        }
        let account = Account { id: Uuid::new_v4().simple().to_string(), name: name.to_string(), email: key.clone() };
        accounts.insert(key, LocalAccount { account: account.clone(), password_hash });
        info!(user_id = %account.id, email = %account.email, "local account added");
        Ok(account)
    }

    fn file_path(&self, id: &str) -> PathBuf {
        self.root.join("files").join(id)
    }
}

#[async_trait]
impl TableBackend for LocalBackend {
    async fn list_rows(&self, table: &str) -> Result<Vec<Value>, BackendError> {
        let mut rows = self.table(table).await?.values().await;
        rows.sort_by(|a, b| created_at(a).cmp(created_at(b)).then_with(|| row_id(a).cmp(row_id(b))));
        Ok(rows)
    }

    async fn get_row(&self, table: &str, id: &str) -> Result<Option<Value>, BackendError> {
        Ok(self.table(table).await?.get(&id.to_string()).await)
    }

    #[instrument(skip(self, data))]
    async fn create_row(&self, table: &str, id: &str, data: Value) -> Result<Value, BackendError> {
        check_name("row", id)?;
        let mut fields = user_fields(data)?;
        let stamp = now();
        fields.insert("$id".into(), Value::String(id.to_string()));
        fields.insert("$createdAt".into(), Value::String(stamp.clone()));
        fields.insert("$updatedAt".into(), Value::String(stamp));
        let row = Value::Object(fields);

        let store = self.table(table).await?;
        store
            .update_map(|m| {
                if m.contains_key(id) {
                    return Err(BackendError::Conflict(format!("row {id} already exists in {table}")));
                }
                m.insert(id.to_string(), row.clone());
                Ok(())
            })
            .await?;
        debug!("row created");
        Ok(row)
    }

    #[instrument(skip(self, data))]
    async fn update_row(&self, table: &str, id: &str, data: Value) -> Result<Value, BackendError> {
        let fields = user_fields(data)?;
        let store = self.table(table).await?;
        store
            .update_map(|m| {
                let row = m.get_mut(id).ok_or(BackendError::NotFound)?;
                if let Value::Object(existing) = row {
                    existing.extend(fields);
                    existing.insert("$updatedAt".into(), Value::String(now()));
                }
                Ok(row.clone())
            })
            .await
    }

    async fn delete_row(&self, table: &str, id: &str) -> Result<bool, BackendError> {
        self.table(table).await?.remove(&id.to_string()).await
    }
}

#[async_trait]
impl SessionBackend for LocalBackend {
    async fn create_session(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let key = email.trim().to_lowercase();
        let user_id = {
            let accounts = self.accounts.read().await;
            let entry = accounts.get(&key).ok_or(BackendError::Unauthorized)?;
            let parsed = PasswordHash::new(&entry.password_hash).map_err(|e| BackendError::Io(e.to_string()))?;
            if Argon2::default().verify_password(password.as_bytes(), &parsed).is_err() {
                return Err(BackendError::Unauthorized);
            }
            entry.account.id.clone()
        };

        let secret: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LEN)
            .map(char::from)
            .collect();
        let expire = (Utc::now() + Duration::hours(SESSION_HOURS)).to_rfc3339_opts(SecondsFormat::Secs, true);
        let session = Session { id: Uuid::new_v4().simple().to_string(), user_id, secret: secret.clone(), expire };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !is_expired(s));
        if sessions.len() < before {
            debug!(swept = before - sessions.len(), "expired sessions dropped");
        }
        sessions.insert(secret, session.clone());
        Ok(session)
    }

    async fn delete_session(&self, secret: &str) -> Result<(), BackendError> {
        match self.sessions.write().await.remove(secret) {
            Some(_) => Ok(()),
            None => Err(BackendError::Unauthorized),
        }
    }

    async fn get_account(&self, secret: &str) -> Result<Account, BackendError> {
        let user_id = {
            let sessions = self.sessions.read().await;
            let session = sessions.get(secret).ok_or(BackendError::Unauthorized)?;
            (!is_expired(session)).then(|| session.user_id.clone())
        };
        let Some(user_id) = user_id else {
            self.sessions.write().await.remove(secret);
            return Err(BackendError::Unauthorized);
        };
        let accounts = self.accounts.read().await;
        accounts
            .values()
            .find(|a| a.account.id == user_id)
            .map(|a| a.account.clone())
            .ok_or(BackendError::Unauthorized)
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload_file(&self, id: &str, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<StoredFile, BackendError> {
        check_name("file", id)?;
        if self.files.get(&id.to_string()).await.is_some() {
            return Err(BackendError::Conflict(format!("file {id} already exists")));
        }
        let meta = StoredFile {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size_original: bytes.len() as u64,
            created_at: Some(now()),
        };
        tokio::fs::write(self.file_path(id), &bytes)
            .await
            .map_err(|e| BackendError::Io(e.to_string()))?;
        self.files.insert(id.to_string(), meta.clone()).await?;
        Ok(meta)
    }

    async fn get_file(&self, id: &str) -> Result<Option<StoredFile>, BackendError> {
        Ok(self.files.get(&id.to_string()).await)
    }

    async fn download_file(&self, id: &str) -> Result<Option<Vec<u8>>, BackendError> {
        if self.files.get(&id.to_string()).await.is_none() {
            return Ok(None);
        }
        let bytes = tokio::fs::read(self.file_path(id))
            .await
            .map_err(|e| BackendError::Io(e.to_string()))?;
        Ok(Some(bytes))
    }

    async fn delete_file(&self, id: &str) -> Result<bool, BackendError> {
        if !self.files.remove(&id.to_string()).await? {
            return Ok(false);
        }
        if let Err(e) = tokio::fs::remove_file(self.file_path(id)).await {
            debug!(%id, error = %e, "file bytes already gone");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::temp_root;

    #[tokio::test]
    async fn create_stamps_meta_and_strips_dollar_keys() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        let row = backend
            .create_row("companies", "co1", json!({"name": "Grafos", "$id": "spoofed"}))
            .await
            .unwrap();
        assert_eq!(row["$id"], "co1");
        assert_eq!(row["name"], "Grafos");
        assert!(row["$createdAt"].is_string());
        assert_eq!(row["$createdAt"], row["$updatedAt"]);
    }

    #[tokio::test]
    async fn duplicate_id_conflicts() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        backend.create_row("inks", "i1", json!({"name": "Cyan"})).await.unwrap();
        let err = backend.create_row("inks", "i1", json!({"name": "Cyan"})).await.unwrap_err();
        assert!(matches!(err, BackendError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_merges_top_level_keys() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        backend
            .create_row("products", "p1", json!({"name": "Flyer", "stock": 10}))
            .await
            .unwrap();
        let row = backend.update_row("products", "p1", json!({"stock": 3})).await.unwrap();
        assert_eq!(row["name"], "Flyer");
        assert_eq!(row["stock"], 3);

        let err = backend.update_row("products", "missing", json!({"stock": 1})).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound));
    }

    #[tokio::test]
    async fn rows_survive_reopen_in_creation_order() {
        let root = temp_root();
        {
            let backend = LocalBackend::open(&root).await.unwrap();
            for id in ["b", "a", "c"] {
                backend.create_row("clients", id, json!({"name": id})).await.unwrap();
            }
            assert!(backend.delete_row("clients", "a").await.unwrap());
            assert!(!backend.delete_row("clients", "a").await.unwrap());
        }
        let backend = LocalBackend::open(&root).await.unwrap();
        let ids: Vec<String> = backend
            .list_rows("clients")
            .await
            .unwrap()
            .iter()
            .map(|r| row_id(r).to_string())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn table_names_cannot_escape_root() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        assert!(backend.list_rows("../etc").await.is_err());
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        let account = backend.add_account("Ana@Grafos.ec", "Ana", "tinta-offset").await.unwrap();

        assert!(matches!(backend.create_session("ana@grafos.ec", "wrong").await, Err(BackendError::Unauthorized)));
        assert!(matches!(backend.create_session("nobody@grafos.ec", "x").await, Err(BackendError::Unauthorized)));

        let session = backend.create_session("ana@grafos.ec", "tinta-offset").await.unwrap();
        assert_eq!(session.secret.len(), SECRET_LEN);
        assert_eq!(backend.get_account(&session.secret).await.unwrap(), account);

        backend.delete_session(&session.secret).await.unwrap();
        assert!(backend.get_account(&session.secret).await.is_err());
        assert!(backend.delete_session(&session.secret).await.is_err());
    }

    fn expired_session(secret: &str, user_id: &str) -> Session {
        Session {
            id: secret.to_string(),
            user_id: user_id.to_string(),
            secret: secret.to_string(),
            expire: (Utc::now() - Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    #[tokio::test]
    async fn expired_sessions_are_dropped() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        let account = backend.add_account("ana@grafos.ec", "Ana", "tinta-offset").await.unwrap();
        {
            let mut sessions = backend.sessions.write().await;
            sessions.insert("old1".into(), expired_session("old1", &account.id));
            sessions.insert("old2".into(), expired_session("old2", &account.id));
        }

        assert!(matches!(backend.get_account("old1").await, Err(BackendError::Unauthorized)));
        assert!(!backend.sessions.read().await.contains_key("old1"));
        assert!(backend.sessions.read().await.contains_key("old2"));

        let fresh = backend.create_session("ana@grafos.ec", "tinta-offset").await.unwrap();
        let sessions = backend.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh.secret));
    }

    #[tokio::test]
    async fn failed_row_write_is_not_listed() {
        let root = temp_root();
        let backend = LocalBackend::open(&root).await.unwrap();
        backend.create_row("orders", "o1", json!({"title": "Flyers"})).await.unwrap();

        let path = root.join("tables").join("orders.json");
        tokio::fs::remove_file(&path).await.unwrap();
        tokio::fs::create_dir(&path).await.unwrap();

        assert!(backend.create_row("orders", "o2", json!({"title": "Afiches"})).await.is_err());
        assert!(backend.get_row("orders", "o2").await.unwrap().is_none());
        assert!(backend.update_row("orders", "o1", json!({"title": "Tarjetas"})).await.is_err());
        let rows = backend.list_rows("orders").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "Flyers");
    }

    #[tokio::test]
    async fn duplicate_account_conflicts() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        backend.add_account("a@b.ec", "A", "password1").await.unwrap();
        assert!(matches!(backend.add_account("A@B.ec", "A", "password2").await, Err(BackendError::Conflict(_))));
    }

    #[tokio::test]
    async fn file_round_trip() {
        let backend = LocalBackend::open(temp_root()).await.unwrap();
        let meta = backend
            .upload_file("f1", "proof.pdf", "application/pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();
        assert_eq!(meta.size_original, 8);
        assert_eq!(backend.download_file("f1").await.unwrap().unwrap(), b"%PDF-1.4");
        assert!(backend.delete_file("f1").await.unwrap());
        assert!(backend.get_file("f1").await.unwrap().is_none());
        assert!(backend.download_file("f1").await.unwrap().is_none());
    }
}
