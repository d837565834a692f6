use crate::domain::entities::repair::{Repair, RepairStatus};
use crate::domain::value_objects::{NotificationId, RepairId, RepairNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pending repair older than this raises an alert.
pub const PENDING_ALERT_DAYS: i64 = 3;
/// An in-progress repair older than this raises an alert.
pub const IN_PROGRESS_ALERT_DAYS: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Pending,
    InProgress,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Pending => "pending",
            AlertKind::InProgress => "in_progress",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An overdue-repair alert raised by the scan. At most one alert exists per
/// `(repair, kind)` pair; alerts are only mutated or removed by user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub repair_id: RepairId,
    pub repair_number: RepairNumber,
    pub kind: AlertKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(
        repair_id: RepairId,
        repair_number: RepairNumber,
        kind: AlertKind,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::random(),
            repair_id,
            repair_number,
            kind,
            message,
            created_at,
            read: false,
        }
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

/// Scans the record set against the elapsed-time thresholds and returns the
/// alerts that are due but not yet raised. Pure: repeated calls over the
/// same input produce nothing new once the alerts exist.
pub fn evaluate(
    now: DateTime<Utc>,
    repairs: &[Repair],
    existing: &[Notification],
) -> Vec<Notification> {
    let today = now.date_naive();
    let mut raised = Vec::new();

    for repair in repairs {
        if repair.is_completed() {
            continue;
        }

        let age_days = (today - repair.received_date).num_days();

        let (kind, threshold, label) = match repair.status {
            RepairStatus::Pending => (AlertKind::Pending, PENDING_ALERT_DAYS, "pending"),
            RepairStatus::InProgress => {
                (AlertKind::InProgress, IN_PROGRESS_ALERT_DAYS, "in progress")
            }
            _ => continue,
        };

        if age_days < threshold {
            continue;
        }

        let already_raised = existing
            .iter()
            .any(|alert| alert.repair_id == repair.id && alert.kind == kind);
        if already_raised {
            continue;
        }

        raised.push(Notification::new(
            repair.id.clone(),
            repair.repair_number.clone(),
            kind,
            format!(
                "Repair #{} has been {} for {} days",
                repair.repair_number, label, age_days
            ),
            now,
        ));
    }

    raised
}
