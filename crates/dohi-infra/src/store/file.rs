use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use dohi_core::ports::KvStore;

/// File-backed key-value store: one JSON object per file, the
/// localStorage analogue for vote tokens and the bearer token.
///
/// Writes go to a temporary file next to the target and are renamed
/// into place, so the file is always either the previous or the fully
/// written new contents.
pub struct FileKvStore {
    path: PathBuf,
    // Serializes read-modify-write cycles against the same file.
    write_lock: Mutex<()>,
}

impl FileKvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store under the platform config directory
    /// (`…/dohi/store.json`), falling back to the working directory
    /// when the platform has none.
    pub fn at_default_location() -> Self {
        let dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join("dohi").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parse store failed: {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => {
                Err(err).with_context(|| format!("read store failed: {}", self.path.display()))
            }
        }
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create store dir failed: {}", dir.display()))?;
        }

        let content = serde_json::to_vec_pretty(entries).context("serialize store failed")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &content)
            .await
            .with_context(|| format!("write store tmp failed: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("rename store failed: {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}
