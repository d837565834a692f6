use crate::application::services::{NotificationService, RepairService};
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Periodic overdue-repair scan. `run_once` is the unit of work; `schedule`
/// wraps it in an interval loop whose handle is the teardown switch.
pub struct NotificationScanJob {
    repairs: Arc<RepairService>,
    notifications: Arc<NotificationService>,
}

impl NotificationScanJob {
    pub fn new(repairs: Arc<RepairService>, notifications: Arc<NotificationService>) -> Self {
        Self {
            repairs,
            notifications,
        }
    }

    pub async fn run_once(&self) -> Result<usize, AppError> {
        let started = Instant::now();
        let records = self.repairs.list().await;
        let scanned = records.len();
        let raised = self.notifications.scan(&records).await?;
        let duration_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

        tracing::info!(
            target: "jobs::notification_scan",
            scanned,
            raised,
            duration_ms,
            "notification scan completed"
        );

        Ok(raised)
    }

    /// Spawns the recurring scan. The first tick fires immediately, then
    /// every `interval_secs`. Aborting the returned handle stops future
    /// scans; an in-flight run completes as a unit.
    pub fn schedule(self: Arc<Self>, interval_secs: u64) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));

            loop {
                interval.tick().await;

                if let Err(e) = self.run_once().await {
                    tracing::error!("Notification scan error: {}", e);
                }
            }
        })
    }
}
