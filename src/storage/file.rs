//! JSON-file storage implementation.
//!
//! Layout inside the data directory:
//!
//! - `config.json`: the search configuration record
//! - `jobs_seen.json`: `{"posted_ids": [...]}`
//! - `saved_jobs.json`: a bare array of job records
//!
//! Writes go to a sibling temp file which is fsynced and renamed over the
//! target, so a crash mid-write leaves either the old or the new record.
//! One async mutex per file serializes read-modify-write sequences.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{ConfigUpdate, StateStore, StorageError};
use crate::config::SearchConfig;
use crate::core::job::JobRecord;
use crate::core::types::JobId;

const CONFIG_FILE: &str = "config.json";
const SEEN_FILE: &str = "jobs_seen.json";
const SAVED_FILE: &str = "saved_jobs.json";

/// On-disk shape of the seen-jobs ledger.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    posted_ids: Vec<JobId>,
}

/// File-backed storage rooted at a data directory.
pub struct FileStore {
    dir: PathBuf,
    config_lock: Mutex<()>,
    seen_lock: Mutex<()>,
    saved_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store in `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error(&dir, e))?;
        Ok(Self {
            dir,
            config_lock: Mutex::new(()),
            seen_lock: Mutex::new(()),
            saved_lock: Mutex::new(()),
        })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    async fn read_config_or_default(&self) -> Result<SearchConfig, StorageError> {
        let path = self.path(CONFIG_FILE);
        match read_json::<SearchConfig>(&path).await? {
            Some(config) => Ok(config),
            None => {
                let config = SearchConfig::default();
                tracing::info!(path = %path.display(), "No search configuration found, writing defaults");
                write_json_atomic(&path, &config).await?;
                Ok(config)
            }
        }
    }

    async fn read_seen(&self) -> Result<SeenFile, StorageError> {
        Ok(read_json::<SeenFile>(&self.path(SEEN_FILE))
            .await?
            .unwrap_or_default())
    }

    async fn read_saved(&self) -> Result<Vec<JobRecord>, StorageError> {
        Ok(read_json::<Vec<JobRecord>>(&self.path(SAVED_FILE))
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load_config(&self) -> Result<SearchConfig, StorageError> {
        let _guard = self.config_lock.lock().await;
        self.read_config_or_default().await
    }

    async fn save_config(&self, config: &SearchConfig) -> Result<(), StorageError> {
        let _guard = self.config_lock.lock().await;
        write_json_atomic(&self.path(CONFIG_FILE), config).await
    }

    async fn update_config(&self, update: ConfigUpdate<'_>) -> Result<SearchConfig, StorageError> {
        let _guard = self.config_lock.lock().await;
        let mut config = self.read_config_or_default().await?;
        update(&mut config);
        write_json_atomic(&self.path(CONFIG_FILE), &config).await?;
        Ok(config)
    }

    async fn load_seen(&self) -> Result<HashSet<JobId>, StorageError> {
        let _guard = self.seen_lock.lock().await;
        Ok(self.read_seen().await?.posted_ids.into_iter().collect())
    }

    async fn extend_seen(&self, ids: &[JobId]) -> Result<(), StorageError> {
        let _guard = self.seen_lock.lock().await;
        let current = self.read_seen().await?;
        let mut merged: HashSet<JobId> = current.posted_ids.into_iter().collect();
        merged.extend(ids.iter().cloned());

        let mut posted_ids: Vec<JobId> = merged.into_iter().collect();
        posted_ids.sort();
        write_json_atomic(&self.path(SEEN_FILE), &SeenFile { posted_ids }).await
    }

    async fn list_saved(&self) -> Result<Vec<JobRecord>, StorageError> {
        let _guard = self.saved_lock.lock().await;
        self.read_saved().await
    }

    async fn append_saved(&self, job: JobRecord) -> Result<(), StorageError> {
        let _guard = self.saved_lock.lock().await;
        let mut jobs = self.read_saved().await?;
        jobs.push(job);
        write_json_atomic(&self.path(SAVED_FILE), &jobs).await
    }

    async fn clear_saved(&self) -> Result<(), StorageError> {
        let _guard = self.saved_lock.lock().await;
        write_json_atomic(&self.path(SAVED_FILE), &Vec::<JobRecord>::new()).await
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read and decode a JSON file. A missing file is `Ok(None)`.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::SerializationError(format!("{}: {}", path.display(), e)))
}

/// Encode `value` as pretty JSON and atomically replace `path` with it.
async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .map_err(|e| io_error(&tmp_path, e))?;
    file.write_all(&body)
        .await
        .map_err(|e| io_error(&tmp_path, e))?;
    file.sync_all().await.map_err(|e| io_error(&tmp_path, e))?;
    drop(file);

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| io_error(path, e))
}
