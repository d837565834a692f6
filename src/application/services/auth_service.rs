use crate::application::ports::local_store::{LocalStore, SESSION_KEY};
use crate::domain::entities::Session;
use crate::shared::config::AuthConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Fixed-credential login gate with a persisted session. Kept only so the
/// hosting UI has something to hang its login screen on; there is no real
/// security here.
pub struct AuthService {
    store: Arc<dyn LocalStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn LocalStore>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Returns whether the credentials were accepted. Acceptance persists
    /// the session; rejection leaves any existing session alone.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, AppError> {
        if username != self.config.username || password != self.config.password {
            return Ok(false);
        }
        let session = Session::authenticated(username.to_string());
        self.persist(&session).await?;
        info!(username, "login accepted");
        Ok(true)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.persist(&Session::anonymous()).await
    }

    pub async fn session(&self) -> Result<Session, AppError> {
        match self.store.get(SESSION_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| AppError::DeserializationError(err.to_string())),
            None => Ok(Session::anonymous()),
        }
    }

    async fn persist(&self, session: &Session) -> Result<(), AppError> {
        let json = serde_json::to_string(session)?;
        self.store.set(SESSION_KEY, &json).await
    }
}
