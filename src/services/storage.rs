use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::error::AppError;

/// Opaque string key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// One `<key>.json` file per key below `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: Arc<PathBuf>,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::InvalidKey(key.to_string()));
        }
        Ok(self.root().join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(self.root()).await?;
        // Each write gets its own temp file so parallel writers never share one.
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, value).await?;
        if let Err(err) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_store_round_trips_and_removes() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path().join("kv"));

        assert_eq!(store.get("tripHistory").await.expect("get"), None);
        store.set("tripHistory", "[]").await.expect("set");
        assert_eq!(
            store.get("tripHistory").await.expect("get").as_deref(),
            Some("[]")
        );

        store.remove("tripHistory").await.expect("remove");
        store
            .remove("tripHistory")
            .await
            .expect("second remove is fine");
        assert_eq!(store.get("tripHistory").await.expect("get"), None);
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_keys() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.set("../escape", "x").await,
            Err(AppError::InvalidKey(_))
        ));
        assert!(matches!(store.get("").await, Err(AppError::InvalidKey(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_writes_leave_no_temp_files_behind() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf());

        let mut tasks = Vec::new();
        for n in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.set("heroImage", &format!("image-{n}")).await
            }));
        }
        for task in tasks {
            task.await.expect("join").expect("every write succeeds");
        }

        let value = store.get("heroImage").await.expect("get").expect("value");
        assert!(value.starts_with("image-"));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("heroImage.json")]);
    }

    #[tokio::test]
    async fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store
            .set("heroImage", "https://example.com/a.png")
            .await
            .expect("set");
        assert_eq!(
            other.get("heroImage").await.expect("get").as_deref(),
            Some("https://example.com/a.png")
        );
    }
}
