//! Local filesystem storage implementation.
//!
//! Every write goes to a sibling `*.tmp` file first and is renamed into
//! place, so readers never observe a half-written state file or feed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::RunState;
use crate::storage::{RunStorage, StateLoad, StateOrigin};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    state_path: PathBuf,
    feed_path: PathBuf,
}

impl LocalStorage {
    /// Create storage for the given state and feed files.
    pub fn new(state_path: impl Into<PathBuf>, feed_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
            feed_path: feed_path.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn feed_path(&self) -> &Path {
        &self.feed_path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut tmp: OsString = path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
        Self::ensure_dir(path).await?;

        let tmp = Self::tmp_path(path);
        let result: std::io::Result<()> = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, path).await
        }
        .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read and decode the state file.
    pub async fn read_state(&self) -> Result<Option<RunState>> {
        match Self::read_bytes(&self.state_path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RunStorage for LocalStorage {
    async fn load_state(&self, now: DateTime<Utc>) -> StateLoad {
        match self.read_state().await {
            Ok(Some(state)) => {
                log::info!(
                    "Loaded state with {} known articles from {}",
                    state.len(),
                    self.state_path.display()
                );
                StateLoad {
                    state,
                    origin: StateOrigin::File,
                }
            }
            Ok(None) => {
                log::info!("No state file at {}; starting fresh", self.state_path.display());
                StateLoad {
                    state: RunState::empty(now),
                    origin: StateOrigin::Missing,
                }
            }
            Err(e) => {
                log::error!(
                    "Error loading state file {}: {}",
                    self.state_path.display(),
                    e
                );
                StateLoad {
                    state: RunState::empty(now),
                    origin: StateOrigin::Corrupt,
                }
            }
        }
    }

    async fn save_state(&self, state: &RunState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)?;
        Self::write_bytes(&self.state_path, &bytes).await
    }

    async fn write_feed(&self, bytes: &[u8]) -> Result<()> {
        Self::write_bytes(&self.feed_path, bytes).await
    }
}
