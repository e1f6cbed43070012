use crate::errors::AppError;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

pub const LOGS_KEY: &str = "smokeLogs";
pub const PROFILE_KEY: &str = "lifetimeProfile";
pub const SETUP_DISMISSED_KEY: &str = "setupDismissed";

/// Named JSON slots kept as one file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Reads a slot, returning `fallback` when it is missing or does not parse.
    pub async fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let path = self.slot_path(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, "failed to parse slot, using default: {err}");
                    fallback
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "slot not found, using default");
                fallback
            }
            Err(err) => {
                error!(key, "failed to read slot: {err}");
                fallback
            }
        }
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(value)?;
        fs::write(self.slot_path(key), payload).await?;
        debug!(key, "slot saved");
        Ok(())
    }

    pub async fn load_flag(&self, key: &str) -> bool {
        match fs::read_to_string(self.slot_path(key)).await {
            Ok(content) => !content.trim().is_empty(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => {
                error!(key, "failed to read flag: {err}");
                false
            }
        }
    }

    pub async fn set_flag(&self, key: &str) -> Result<(), AppError> {
        fs::write(self.slot_path(key), "1").await?;
        Ok(())
    }
}
