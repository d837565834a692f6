use crate::application::ports::local_store::{LocalStore, REPAIRS_KEY};
use crate::application::ports::Clock;
use crate::application::services::BackupService;
use crate::domain::entities::backup::snapshot_filename;
use crate::domain::entities::repair::{Repair, RepairDraft, RepairPatch};
use crate::domain::ledger::{Applied, RepairAction, RepairLedger};
use crate::domain::value_objects::{RepairId, RepairNumber};
use crate::shared::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::debug;

/// A full-set export ready to hand to the user as a download.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub filename: String,
    pub json: String,
}

/// The record store. Owns the in-memory ledger; every dispatched mutation
/// commits the new state, mirrors the full set to storage, publishes it to
/// subscribers, then hands the result to the backup scheduler.
pub struct RepairService {
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
    backup: Arc<BackupService>,
    ledger: RwLock<RepairLedger>,
    state_tx: watch::Sender<Vec<Repair>>,
}

impl RepairService {
    pub fn new(
        store: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
        backup: Arc<BackupService>,
    ) -> Self {
        let (state_tx, _) = watch::channel(Vec::new());
        Self {
            store,
            clock,
            backup,
            ledger: RwLock::new(RepairLedger::new()),
            state_tx,
        }
    }

    /// Hydrates the ledger from storage. Missing key means an empty store;
    /// no backup evaluation runs for the initial load.
    pub async fn load(&self) -> Result<usize, AppError> {
        let repairs: Vec<Repair> = match self.store.get(REPAIRS_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| AppError::DeserializationError(err.to_string()))?,
            None => Vec::new(),
        };
        let count = repairs.len();
        let mut ledger = self.ledger.write().await;
        *ledger = RepairLedger::from_records(repairs);
        self.state_tx.send_replace(ledger.records().to_vec());
        debug!(records = count, "repair ledger loaded");
        Ok(count)
    }

    pub async fn create(&self, draft: RepairDraft) -> Result<Repair, AppError> {
        match self.dispatch(RepairAction::Create(draft)).await? {
            (Applied::Created(id), records) => records
                .into_iter()
                .find(|repair| repair.id == id)
                .ok_or_else(|| AppError::Internal("created record missing".to_string())),
            _ => Err(AppError::Internal("unexpected create outcome".to_string())),
        }
    }

    /// Partial update. A missing id is a silent no-op, tolerated because
    /// the UI can race a deletion.
    pub async fn update(&self, id: RepairId, patch: RepairPatch) -> Result<(), AppError> {
        self.dispatch(RepairAction::Update { id, patch }).await?;
        Ok(())
    }

    pub async fn delete(&self, id: RepairId) -> Result<(), AppError> {
        self.dispatch(RepairAction::Delete(id)).await?;
        Ok(())
    }

    pub async fn mark_delivered(
        &self,
        id: RepairId,
        delivery_date: NaiveDate,
    ) -> Result<(), AppError> {
        self.dispatch(RepairAction::MarkDelivered { id, delivery_date })
            .await?;
        Ok(())
    }

    pub async fn mark_supplier_delivered(&self, id: RepairId) -> Result<(), AppError> {
        self.dispatch(RepairAction::MarkSupplierDelivered(id))
            .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: &RepairId) -> Option<Repair> {
        self.ledger.read().await.get(id).cloned()
    }

    pub async fn list(&self) -> Vec<Repair> {
        self.ledger.read().await.records().to_vec()
    }

    pub async fn next_repair_number(&self) -> RepairNumber {
        self.ledger.read().await.next_repair_number()
    }

    /// Current record set as a watch channel; subscribers see every commit.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Repair>> {
        self.state_tx.subscribe()
    }

    /// Serializes the full current set into a dated download document.
    pub async fn export_json(&self) -> Result<ExportDocument, AppError> {
        let records = self.list().await;
        let json = serde_json::to_string_pretty(&records)?;
        Ok(ExportDocument {
            filename: snapshot_filename(self.clock.today()),
            json,
        })
    }

    /// Replaces the full set with a previously exported document. Malformed
    /// input mutates nothing.
    pub async fn import_json(&self, data: &str) -> Result<usize, AppError> {
        let records: Vec<Repair> = serde_json::from_str(data)
            .map_err(|err| AppError::DeserializationError(err.to_string()))?;
        let count = records.len();
        self.dispatch(RepairAction::Replace(records)).await?;
        Ok(count)
    }

    /// The commit pipeline: apply, mirror to storage, broadcast, then run
    /// the backup evaluation. Every dispatched action walks the whole
    /// pipeline, misses included; the scheduler decides whether a snapshot
    /// is actually owed.
    async fn dispatch(&self, action: RepairAction) -> Result<(Applied, Vec<Repair>), AppError> {
        let (applied, records) = {
            let mut ledger = self.ledger.write().await;
            let applied = ledger.apply(action, self.clock.today());
            (applied, ledger.records().to_vec())
        };

        let json = serde_json::to_string(&records)?;
        self.store.set(REPAIRS_KEY, &json).await?;

        self.state_tx.send_replace(records.clone());
        self.backup.run_on_mutation(&records).await;

        Ok((applied, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::repair::RepairStatus;
    use crate::infrastructure::storage::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn service() -> (RepairService, Arc<MemoryStore>) {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
        let backup = Arc::new(BackupService::new(store.clone(), clock.clone()));
        (
            RepairService::new(store.clone(), clock, backup),
            store,
        )
    }

    #[tokio::test]
    async fn create_assigns_sequential_numbers_and_pending_status() {
        let (service, _store) = service();

        for expected in ["REP001", "REP002", "REP003"] {
            let repair = service.create(RepairDraft::default()).await.unwrap();
            assert_eq!(repair.repair_number.as_str(), expected);
            assert_eq!(repair.status, RepairStatus::Pending);
            assert_eq!(repair.received_date, fixed_now().date_naive());
        }
    }

    #[tokio::test]
    async fn mutations_mirror_the_full_set_to_storage() {
        let (service, store) = service();
        let repair = service.create(RepairDraft::default()).await.unwrap();

        let stored: Vec<Repair> =
            serde_json::from_str(&store.get(REPAIRS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, repair.id);

        service.delete(repair.id).await.unwrap();
        let stored: Vec<Repair> =
            serde_json::from_str(&store.get(REPAIRS_KEY).await.unwrap().unwrap()).unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn subscribers_observe_every_commit() {
        let (service, _store) = service();
        let mut rx = service.subscribe();

        let repair = service.create(RepairDraft::default()).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        service.delete(repair.id).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test]
    async fn update_on_missing_id_is_a_silent_noop() {
        let (service, _store) = service();
        service.create(RepairDraft::default()).await.unwrap();
        let before = service.list().await;

        service
            .update(
                RepairId::random(),
                RepairPatch {
                    problem: Some("ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(service.list().await, before);
    }

    #[tokio::test]
    async fn delivery_transitions_round_trip_through_get_by_id() {
        let (service, _store) = service();
        let repair = service.create(RepairDraft::default()).await.unwrap();

        service
            .mark_supplier_delivered(repair.id.clone())
            .await
            .unwrap();
        let fetched = service.get_by_id(&repair.id).await.unwrap();
        assert_eq!(fetched.status, RepairStatus::SupplierDelivered);
        assert!(fetched.delivery_date.is_none());

        let delivered = fixed_now().date_naive();
        service
            .mark_delivered(repair.id.clone(), delivered)
            .await
            .unwrap();
        let fetched = service.get_by_id(&repair.id).await.unwrap();
        assert_eq!(fetched.status, RepairStatus::Completed);
        assert_eq!(fetched.delivery_date, Some(delivered));
    }

    #[tokio::test]
    async fn load_hydrates_from_the_repairs_key() {
        let (svc, store) = service();
        svc.create(RepairDraft::default()).await.unwrap();
        let mirrored = store.get(REPAIRS_KEY).await.unwrap().unwrap();

        let (fresh, fresh_store) = service();
        fresh_store.set(REPAIRS_KEY, &mirrored).await.unwrap();
        assert_eq!(fresh.load().await.unwrap(), 1);
        assert_eq!(fresh.list().await.len(), 1);
        assert_eq!(fresh.next_repair_number().await.as_str(), "REP002");
    }

    #[tokio::test]
    async fn export_names_the_document_by_date() {
        let (service, _store) = service();
        service.create(RepairDraft::default()).await.unwrap();

        let doc = service.export_json().await.unwrap();
        assert_eq!(doc.filename, "repair-system-backup-2025-06-15.json");
        let parsed: Vec<Repair> = serde_json::from_str(&doc.json).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[tokio::test]
    async fn malformed_import_leaves_the_store_untouched() {
        let (service, _store) = service();
        service.create(RepairDraft::default()).await.unwrap();

        let err = service.import_json("{not json").await.unwrap_err();
        assert!(matches!(err, AppError::DeserializationError(_)));
        assert_eq!(service.list().await.len(), 1);
    }

    #[tokio::test]
    async fn import_replaces_the_full_set() {
        let (svc, _store) = service();
        svc.create(RepairDraft::default()).await.unwrap();
        let doc = svc.export_json().await.unwrap();

        let (other, _other_store) = service();
        other.create(RepairDraft::default()).await.unwrap();
        other.create(RepairDraft::default()).await.unwrap();

        assert_eq!(other.import_json(&doc.json).await.unwrap(), 1);
        assert_eq!(other.list().await.len(), 1);
    }
}
