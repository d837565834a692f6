use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a notification alert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(value: String) -> Result<Self, String> {
        if value.is_empty() {
            return Err("NotificationId cannot be empty".to_string());
        }
        uuid::Uuid::parse_str(&value)
            .map_err(|err| format!("Invalid NotificationId format: {err}"))?;
        Ok(Self(value))
    }

    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NotificationId> for String {
    fn from(value: NotificationId) -> Self {
        value.0
    }
}
