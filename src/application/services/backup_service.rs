use crate::application::ports::local_store::{
    backup_key, LocalStore, BACKUP_CATALOG_KEY, BACKUP_SETTINGS_KEY,
};
use crate::application::ports::Clock;
use crate::domain::entities::backup::{snapshot_filename, BackupSettings};
use crate::domain::entities::Repair;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{error, info};

/// Decides on every store mutation whether a new snapshot is owed, writes
/// it, and prunes the catalog down to the retention count. The implicit
/// mutation path is best-effort: failures are logged and swallowed so the
/// triggering mutation still succeeds.
pub struct BackupService {
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
}

impl BackupService {
    pub fn new(store: Arc<dyn LocalStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn settings(&self) -> Result<BackupSettings, AppError> {
        match self.store.get(BACKUP_SETTINGS_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| AppError::DeserializationError(err.to_string())),
            None => Ok(BackupSettings::default()),
        }
    }

    pub async fn update_settings(&self, settings: &BackupSettings) -> Result<(), AppError> {
        let json = serde_json::to_string(settings)?;
        self.store.set(BACKUP_SETTINGS_KEY, &json).await
    }

    /// Backup hook run after every committed store mutation. Never fails
    /// from the caller's point of view.
    pub async fn run_on_mutation(&self, repairs: &[Repair]) {
        match self.try_backup(repairs).await {
            Ok(Some(filename)) => {
                info!(
                    target: "backup",
                    filename = %filename,
                    records = repairs.len(),
                    "backup completed"
                );
            }
            Ok(None) => {}
            Err(err) => {
                error!(target: "backup", "backup failed: {err}");
            }
        }
    }

    async fn try_backup(&self, repairs: &[Repair]) -> Result<Option<String>, AppError> {
        let mut settings = self.settings().await?;
        let now = self.clock.now();

        if !settings.enabled || !settings.is_due(now) {
            return Ok(None);
        }

        let filename = snapshot_filename(now.date_naive());
        let payload = serde_json::to_string(repairs)?;
        self.store.set(&backup_key(&filename), &payload).await?;

        let mut catalog = self.list_backups().await?;
        catalog.retain(|entry| entry != &filename);
        catalog.insert(0, filename.clone());
        self.write_catalog(&catalog).await?;

        settings.last_backup = Some(now);
        self.update_settings(&settings).await?;

        self.prune(catalog, settings.max_backups).await?;

        Ok(Some(filename))
    }

    /// Snapshot catalog, most-recent first.
    pub async fn list_backups(&self) -> Result<Vec<String>, AppError> {
        match self.store.get(BACKUP_CATALOG_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| AppError::DeserializationError(err.to_string())),
            None => Ok(Vec::new()),
        }
    }

    pub async fn restore_backup(&self, filename: &str) -> Result<Option<Vec<Repair>>, AppError> {
        match self.store.get(&backup_key(filename)).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|err| AppError::DeserializationError(err.to_string())),
            None => Ok(None),
        }
    }

    pub async fn delete_backup(&self, filename: &str) -> Result<(), AppError> {
        let mut catalog = self.list_backups().await?;
        catalog.retain(|entry| entry != filename);
        self.write_catalog(&catalog).await?;
        self.store.remove(&backup_key(filename)).await
    }

    async fn write_catalog(&self, catalog: &[String]) -> Result<(), AppError> {
        let json = serde_json::to_string(catalog)?;
        self.store.set(BACKUP_CATALOG_KEY, &json).await
    }

    async fn prune(&self, mut catalog: Vec<String>, max_backups: usize) -> Result<(), AppError> {
        if catalog.len() <= max_backups {
            return Ok(());
        }
        let excess = catalog.split_off(max_backups);
        self.write_catalog(&catalog).await?;
        for filename in excess {
            self.store.remove(&backup_key(&filename)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::backup::BackupFrequency;
    use crate::domain::entities::repair::RepairDraft;
    use crate::domain::value_objects::RepairNumber;
    use crate::infrastructure::storage::MemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn scan_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn service_at(now: DateTime<Utc>) -> (BackupService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = BackupService::new(store.clone(), Arc::new(FixedClock(now)));
        (service, store)
    }

    fn sample_repairs() -> Vec<Repair> {
        vec![Repair::new(
            RepairDraft::default(),
            RepairNumber::from_ordinal(1),
            scan_time().date_naive(),
        )]
    }

    async fn enable_weekly(service: &BackupService, last_backup: Option<DateTime<Utc>>) {
        let settings = BackupSettings {
            enabled: true,
            frequency: BackupFrequency::Weekly,
            last_backup,
            max_backups: 5,
        };
        service.update_settings(&settings).await.unwrap();
    }

    #[tokio::test]
    async fn disabled_settings_produce_no_snapshot() {
        let (service, _store) = service_at(scan_time());
        service.run_on_mutation(&sample_repairs()).await;
        assert!(service.list_backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overdue_weekly_backup_snapshots_and_advances_last_backup() {
        let now = scan_time();
        let (service, _store) = service_at(now);
        enable_weekly(&service, Some(now - Duration::days(8))).await;

        service.run_on_mutation(&sample_repairs()).await;

        let catalog = service.list_backups().await.unwrap();
        assert_eq!(catalog, vec!["repair-system-backup-2025-06-15.json"]);
        assert_eq!(service.settings().await.unwrap().last_backup, Some(now));

        let restored = service.restore_backup(&catalog[0]).await.unwrap().unwrap();
        assert_eq!(restored.len(), 1);
    }

    #[tokio::test]
    async fn recent_weekly_backup_is_skipped() {
        let now = scan_time();
        let (service, _store) = service_at(now);
        let last = Some(now - Duration::days(2));
        enable_weekly(&service, last).await;

        service.run_on_mutation(&sample_repairs()).await;

        assert!(service.list_backups().await.unwrap().is_empty());
        assert_eq!(service.settings().await.unwrap().last_backup, last);
    }

    #[tokio::test]
    async fn missing_last_backup_is_always_eligible() {
        let (service, _store) = service_at(scan_time());
        enable_weekly(&service, None).await;

        service.run_on_mutation(&sample_repairs()).await;
        assert_eq!(service.list_backups().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn prune_drops_oldest_snapshots_and_payloads() {
        let now = scan_time();
        let (service, store) = service_at(now);

        // Five older snapshots already in the catalog, most-recent first.
        let mut catalog = Vec::new();
        for day in (10..15).rev() {
            let filename = format!("repair-system-backup-2025-06-{day:02}.json");
            store.set(&backup_key(&filename), "[]").await.unwrap();
            catalog.push(filename);
        }
        store
            .set(BACKUP_CATALOG_KEY, &serde_json::to_string(&catalog).unwrap())
            .await
            .unwrap();

        let settings = BackupSettings {
            enabled: true,
            frequency: BackupFrequency::Daily,
            last_backup: Some(now - Duration::days(1)),
            max_backups: 3,
        };
        service.update_settings(&settings).await.unwrap();

        service.run_on_mutation(&sample_repairs()).await;

        let kept = service.list_backups().await.unwrap();
        assert_eq!(
            kept,
            vec![
                "repair-system-backup-2025-06-15.json",
                "repair-system-backup-2025-06-14.json",
                "repair-system-backup-2025-06-13.json",
            ]
        );
        for dropped in [
            "repair-system-backup-2025-06-12.json",
            "repair-system-backup-2025-06-11.json",
            "repair-system-backup-2025-06-10.json",
        ] {
            assert!(!store.contains(&backup_key(dropped)).await.unwrap());
        }
        for kept_name in &kept {
            assert!(store.contains(&backup_key(kept_name)).await.unwrap());
        }
    }

    struct FailingWriteStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl FailingWriteStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                fail_writes: AtomicBool::new(false),
            }
        }
    }

    #[async_trait::async_trait]
    impl LocalStore for FailingWriteStore {
        async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Storage("disk full".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), AppError> {
            self.inner.remove(key).await
        }

        async fn contains(&self, key: &str) -> Result<bool, AppError> {
            self.inner.contains(key).await
        }
    }

    #[tokio::test]
    async fn storage_failure_is_swallowed_on_the_mutation_path() {
        let store = Arc::new(FailingWriteStore::new());
        let service = BackupService::new(store.clone(), Arc::new(FixedClock(scan_time())));
        enable_weekly(&service, None).await;

        store.fail_writes.store(true, Ordering::SeqCst);
        // Must not surface the error.
        service.run_on_mutation(&sample_repairs()).await;

        store.fail_writes.store(false, Ordering::SeqCst);
        assert!(service.list_backups().await.unwrap().is_empty());
    }
}
