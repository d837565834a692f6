use serde::{Deserialize, Serialize};

/// Login state, persisted as its own storage key. This is a UI gate only;
/// there is no real security boundary behind it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub username: Option<String>,
}

impl Session {
    pub fn authenticated(username: String) -> Self {
        Self {
            authenticated: true,
            username: Some(username),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}
