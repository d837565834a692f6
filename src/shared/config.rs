use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub notifications: NotificationConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub scan_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: default_data_dir(),
            },
            notifications: NotificationConfig {
                scan_interval_secs: 3600, // 1 hour
            },
            auth: AuthConfig {
                username: "admin".to_string(),
                password: "admin".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("REPAIRDESK_DATA_DIR") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                cfg.storage.data_dir = trimmed.to_string();
            }
        }

        if let Ok(v) = std::env::var("REPAIRDESK_SCAN_INTERVAL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.notifications.scan_interval_secs = value.max(1);
            }
        }

        if let Ok(v) = std::env::var("REPAIRDESK_AUTH_USERNAME") {
            if !v.trim().is_empty() {
                cfg.auth.username = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("REPAIRDESK_AUTH_PASSWORD") {
            if !v.is_empty() {
                cfg.auth.password = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.storage.data_dir.trim().is_empty() {
            return Err("Storage data_dir must not be empty".to_string());
        }
        if self.notifications.scan_interval_secs == 0 {
            return Err("Notification scan_interval_secs must be greater than 0".to_string());
        }
        if self.auth.username.is_empty() {
            return Err("Auth username must not be empty".to_string());
        }
        Ok(())
    }
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|dir| dir.join("repairdesk").to_string_lossy().into_owned())
        .unwrap_or_else(|| "./data".to_string())
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
