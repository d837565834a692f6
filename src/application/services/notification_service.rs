use crate::application::ports::local_store::{LocalStore, NOTIFICATIONS_KEY};
use crate::application::ports::Clock;
use crate::domain::entities::notification::{evaluate, Notification};
use crate::domain::entities::Repair;
use crate::domain::value_objects::NotificationId;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns the alert list. The scan appends whatever the pure evaluator finds
/// due; everything else here is user-driven list maintenance.
pub struct NotificationService {
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
    alerts: RwLock<Vec<Notification>>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn LocalStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub async fn load(&self) -> Result<usize, AppError> {
        let alerts: Vec<Notification> = match self.store.get(NOTIFICATIONS_KEY).await? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| AppError::DeserializationError(err.to_string()))?,
            None => Vec::new(),
        };
        let count = alerts.len();
        *self.alerts.write().await = alerts;
        Ok(count)
    }

    /// Runs the detector over the given record set. Returns how many new
    /// alerts were raised.
    pub async fn scan(&self, repairs: &[Repair]) -> Result<usize, AppError> {
        let mut alerts = self.alerts.write().await;
        let raised = evaluate(self.clock.now(), repairs, &alerts);
        if raised.is_empty() {
            return Ok(0);
        }
        let count = raised.len();
        alerts.extend(raised);
        self.persist(&alerts).await?;
        Ok(count)
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.alerts.read().await.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.alerts
            .read()
            .await
            .iter()
            .filter(|alert| !alert.read)
            .count()
    }

    pub async fn mark_read(&self, id: &NotificationId) -> Result<(), AppError> {
        let mut alerts = self.alerts.write().await;
        if let Some(alert) = alerts.iter_mut().find(|alert| alert.id == *id) {
            alert.mark_read();
            self.persist(&alerts).await?;
        }
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<(), AppError> {
        let mut alerts = self.alerts.write().await;
        for alert in alerts.iter_mut() {
            alert.mark_read();
        }
        self.persist(&alerts).await
    }

    pub async fn remove(&self, id: &NotificationId) -> Result<(), AppError> {
        let mut alerts = self.alerts.write().await;
        let before = alerts.len();
        alerts.retain(|alert| alert.id != *id);
        if alerts.len() < before {
            self.persist(&alerts).await?;
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        let mut alerts = self.alerts.write().await;
        alerts.clear();
        self.persist(&alerts).await
    }

    async fn persist(&self, alerts: &[Notification]) -> Result<(), AppError> {
        let json = serde_json::to_string(alerts)?;
        self.store.set(NOTIFICATIONS_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::notification::AlertKind;
    use crate::domain::entities::repair::{RepairDraft, RepairStatus};
    use crate::domain::value_objects::RepairNumber;
    use crate::infrastructure::storage::MemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn service() -> (NotificationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            NotificationService::new(store.clone(), Arc::new(FixedClock(fixed_now()))),
            store,
        )
    }

    fn aged_repair(days: i64, status: RepairStatus) -> Repair {
        let mut repair = Repair::new(
            RepairDraft::default(),
            RepairNumber::from_ordinal(1),
            fixed_now().date_naive() - Duration::days(days),
        );
        repair.status = status;
        repair
    }

    #[tokio::test]
    async fn scan_raises_once_and_persists() {
        let (service, store) = service();
        let repairs = vec![aged_repair(4, RepairStatus::Pending)];

        assert_eq!(service.scan(&repairs).await.unwrap(), 1);
        assert_eq!(service.scan(&repairs).await.unwrap(), 0);

        let alerts = service.list().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Pending);

        let stored: Vec<Notification> =
            serde_json::from_str(&store.get(NOTIFICATIONS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn dedup_survives_a_reload() {
        let (service, store) = service();
        let repairs = vec![aged_repair(10, RepairStatus::InProgress)];
        service.scan(&repairs).await.unwrap();

        let reloaded = NotificationService::new(store, Arc::new(FixedClock(fixed_now())));
        reloaded.load().await.unwrap();
        assert_eq!(reloaded.scan(&repairs).await.unwrap(), 0);
        assert_eq!(reloaded.list().await.len(), 1);
    }

    #[tokio::test]
    async fn mark_read_and_counts() {
        let (service, _store) = service();
        service
            .scan(&[aged_repair(5, RepairStatus::Pending)])
            .await
            .unwrap();

        assert_eq!(service.unread_count().await, 1);
        let id = service.list().await[0].id.clone();
        service.mark_read(&id).await.unwrap();
        assert_eq!(service.unread_count().await, 0);
        assert!(service.list().await[0].read);

        // Unknown ids are ignored.
        service.mark_read(&NotificationId::random()).await.unwrap();
    }

    #[tokio::test]
    async fn remove_and_clear_destroy_alerts() {
        let (service, _store) = service();
        let mut first = aged_repair(5, RepairStatus::Pending);
        first.repair_number = RepairNumber::from_ordinal(1);
        let second = aged_repair(9, RepairStatus::InProgress);
        service.scan(&[first, second]).await.unwrap();
        assert_eq!(service.list().await.len(), 2);

        let id = service.list().await[0].id.clone();
        service.remove(&id).await.unwrap();
        assert_eq!(service.list().await.len(), 1);

        service.clear().await.unwrap();
        assert!(service.list().await.is_empty());
    }
}
