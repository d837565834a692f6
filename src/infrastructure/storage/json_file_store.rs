use crate::application::ports::LocalStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// File-backed key-value store: one JSON document per key under a data
/// directory, the on-disk analogue of browser local storage.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are flat identifiers; anything path-hostile is mapped away
        // so a key can never escape the data directory.
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::Storage(err.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        tokio::fs::write(self.path_for(key), value)
            .await
            .map_err(|err| AppError::Storage(err.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            // Already gone is fine.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Storage(err.to_string())),
        }
    }

    async fn contains(&self, key: &str) -> Result<bool, AppError> {
        Ok(tokio::fs::try_exists(self.path_for(key))
            .await
            .map_err(|err| AppError::Storage(err.to_string()))?)
    }
}
