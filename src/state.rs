use crate::application::ports::{Clock, LocalStore};
use crate::application::services::{
    AuthService, BackupService, NotificationService, RepairService, TicketService,
};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::jobs::NotificationScanJob;
use crate::infrastructure::storage::JsonFileStore;
use crate::shared::config::AppConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Composition root wiring storage, clock, and the services together for a
/// hosting UI.
#[derive(Clone)]
pub struct AppState {
    pub repairs: Arc<RepairService>,
    pub notifications: Arc<NotificationService>,
    pub backups: Arc<BackupService>,
    pub tickets: Arc<TicketService>,
    pub auth: Arc<AuthService>,
    scan_interval_secs: u64,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let store: Arc<dyn LocalStore> =
            Arc::new(JsonFileStore::new(&config.storage.data_dir).await?);
        Self::with_store(config, store)
    }

    /// Same wiring over an arbitrary store, e.g. an in-memory one.
    pub fn with_store(config: AppConfig, store: Arc<dyn LocalStore>) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

        let backups = Arc::new(BackupService::new(store.clone(), clock.clone()));
        let repairs = Arc::new(RepairService::new(
            store.clone(),
            clock.clone(),
            backups.clone(),
        ));
        let notifications = Arc::new(NotificationService::new(store.clone(), clock));
        let tickets = Arc::new(TicketService::new(store.clone()));
        let auth = Arc::new(AuthService::new(store, config.auth.clone()));

        Ok(Self {
            repairs,
            notifications,
            backups,
            tickets,
            auth,
            scan_interval_secs: config.notifications.scan_interval_secs,
        })
    }

    /// Hydrates the in-memory state from storage.
    pub async fn load(&self) -> anyhow::Result<()> {
        self.repairs.load().await?;
        self.notifications.load().await?;
        Ok(())
    }

    /// Starts the recurring overdue-repair scan (first run immediate).
    /// Abort the handle to stop scheduling future scans.
    pub fn start_notification_scan(&self) -> JoinHandle<()> {
        let job = Arc::new(NotificationScanJob::new(
            self.repairs.clone(),
            self.notifications.clone(),
        ));
        job.schedule(self.scan_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::repair::RepairDraft;
    use crate::infrastructure::storage::MemoryStore;

    #[tokio::test]
    async fn state_wires_services_over_a_shared_store() {
        let state =
            AppState::with_store(AppConfig::default(), Arc::new(MemoryStore::new())).unwrap();
        state.load().await.unwrap();

        let repair = state.repairs.create(RepairDraft::default()).await.unwrap();
        assert!(state.repairs.get_by_id(&repair.id).await.is_some());

        let ticket = state.tickets.render(&repair).await.unwrap();
        assert!(ticket.contains(repair.repair_number.as_str()));
    }
}
