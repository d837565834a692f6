use crate::shared::error::AppError;
use async_trait::async_trait;

/// Key-value persistence boundary. Values are JSON documents; keys are flat
/// strings. Mirrors a browser-local-storage shaped backend.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove(&self, key: &str) -> Result<(), AppError>;
    async fn contains(&self, key: &str) -> Result<bool, AppError>;
}

/// Storage key holding the full repair record set.
pub const REPAIRS_KEY: &str = "repairs";
/// Storage key holding the ordered snapshot catalog, most-recent first.
pub const BACKUP_CATALOG_KEY: &str = "repair-system-backups";
/// Storage key holding the backup policy.
pub const BACKUP_SETTINGS_KEY: &str = "backup-settings";
/// Storage key holding receipt formatting preferences.
pub const PRINTER_SETTINGS_KEY: &str = "printer-settings";
/// Storage key holding the alert list.
pub const NOTIFICATIONS_KEY: &str = "notification-storage";
/// Storage key holding the login session.
pub const SESSION_KEY: &str = "auth-storage";

/// Storage key of one snapshot payload.
pub fn backup_key(filename: &str) -> String {
    format!("backup-{filename}")
}
