use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::backend::BackendError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `HashMap<K, V>` to a JSON file after every write. The local
/// backend keeps one per table plus one for file metadata.
pub struct JsonMapStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
    file_path: PathBuf,
}

fn io_err(e: impl std::fmt::Display) -> BackendError {
    BackendError::Io(e.to_string())
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Open the store at `path`. Creates the file with an empty map if missing.
    ///
    /// A file that exists but does not parse is an error rather than an empty
    /// map, so a bad edit never gets silently overwritten.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, BackendError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| BackendError::Decode(format!("{}: {e}", file_path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(io_err)?)
                    .await
                    .map_err(io_err)?;
                empty
            }
            Err(e) => return Err(io_err(e)),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    async fn save(&self, map: &HashMap<K, V>) -> Result<(), BackendError> {
        let data = serde_json::to_vec(map).map_err(io_err)?;
        fs::write(&self.file_path, data).await.map_err(io_err)?;
        Ok(())
    }

    /// All values, in no particular order.
    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    pub async fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.read().await.values().any(|v| v == value)
    }

    /// Insert or update a value by key and persist.
    ///
    /// The previous value is restored when the write fails.
    pub async fn insert(&self, key: K, value: V) -> Result<(), BackendError> {
        let mut map = self.inner.write().await;
        let previous = map.insert(key.clone(), value);
        if let Err(e) = self.save(&map).await {
            match previous {
                Some(old) => map.insert(key, old),
                None => map.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Remove a key and persist; returns whether it existed.
    ///
    /// The entry stays when the write fails.
    pub async fn remove(&self, key: &K) -> Result<bool, BackendError> {
        let mut map = self.inner.write().await;
        let Some(old) = map.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.save(&map).await {
            map.insert(key.clone(), old);
            return Err(e);
        }
        Ok(true)
    }

    /// Apply a mutation to a copy of the map, persist it, then swap it in.
    ///
    /// The in-memory map only changes when both `f` and the write succeed.
    pub async fn update_map<F, T>(&self, f: F) -> Result<T, BackendError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<T, BackendError>,
    {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        let out = f(&mut next)?;
        self.save(&next).await?;
        *map = next;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::new(&tmp).await?;

        assert_eq!(store.len().await, 0);

        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));
        assert!(store.contains_value(&"2".to_string()).await);

        let old = store
            .update_map(|m| Ok(m.insert("a".to_string(), "10".into())))
            .await?;
        assert_eq!(old.as_deref(), Some("1"));

        assert!(store.remove(&"b".into()).await?);
        assert!(!store.remove(&"b".into()).await?);

        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        assert_eq!(reloaded.values().await, vec!["10".to_string()]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_update_leaves_file_untouched() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, u32>::new(&tmp).await?;
        store.insert("k".into(), 1).await?;

        let res = store
            .update_map(|_| -> Result<(), BackendError> { Err(BackendError::Conflict("k".into())) })
            .await;
        assert!(matches!(res, Err(BackendError::Conflict(_))));

        let reloaded = JsonMapStore::<String, u32>::new(&tmp).await?;
        assert_eq!(reloaded.get(&"k".into()).await, Some(1));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_unchanged() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, u32>::new(&tmp).await?;
        store.insert("kept".into(), 1).await?;

        // a directory at the file path makes every save fail
        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        assert!(store.insert("k".into(), 7).await.is_err());
        assert_eq!(store.get(&"k".into()).await, None);

        assert!(store.insert("kept".into(), 2).await.is_err());
        assert_eq!(store.get(&"kept".into()).await, Some(1));

        let res = store.update_map(|m| Ok(m.insert("j".to_string(), 9))).await;
        assert!(res.is_err());
        assert_eq!(store.get(&"j".into()).await, None);

        assert!(store.remove(&"kept".into()).await.is_err());
        assert_eq!(store.get(&"kept".into()).await, Some(1));
        assert_eq!(store.len().await, 1);

        let _ = tokio::fs::remove_dir(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await.unwrap();
        let res = JsonMapStore::<String, String>::new(&tmp).await;
        assert!(matches!(res, Err(BackendError::Decode(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
    }
}
