//! Session storage backed by a small JSON file, so a token survives between
//! CLI invocations and is shared by every process pointed at the same path.

use async_trait::async_trait;
use roomdesk_core::{ClientError, ClientResult, SessionStorage};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Corrupt session file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        ClientError::Storage(err.to_string())
    }
}

pub struct FileSessionStorage {
    path: PathBuf,
    // Serializes read-modify-write within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let body = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Write-then-rename so a concurrent reader never sees half a file.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.read_entries().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}
