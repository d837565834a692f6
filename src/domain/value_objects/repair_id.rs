use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a repair record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepairId(String);

impl RepairId {
    /// Wraps an existing identifier string.
    pub fn new(value: String) -> Result<Self, String> {
        if value.is_empty() {
            return Err("RepairId cannot be empty".to_string());
        }
        uuid::Uuid::parse_str(&value).map_err(|err| format!("Invalid RepairId format: {err}"))?;
        Ok(Self(value))
    }

    /// Generates a fresh identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RepairId> for String {
    fn from(value: RepairId) -> Self {
        value.0
    }
}
