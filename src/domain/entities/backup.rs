use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    Daily,
    Weekly,
    Monthly,
}

/// Automatic backup policy, persisted as its own storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSettings {
    pub enabled: bool,
    pub frequency: BackupFrequency,
    pub last_backup: Option<DateTime<Utc>>,
    pub max_backups: usize,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: BackupFrequency::Weekly,
            last_backup: None,
            max_backups: 5,
        }
    }
}

impl BackupSettings {
    /// Whether enough time has elapsed since the last snapshot. A missing
    /// `last_backup` counts as infinitely overdue. `monthly` is a calendar
    /// month, not a fixed number of days.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_backup else {
            return true;
        };
        match self.frequency {
            BackupFrequency::Daily => now - last >= Duration::days(1),
            BackupFrequency::Weekly => now - last >= Duration::weeks(1),
            BackupFrequency::Monthly => match last.checked_add_months(Months::new(1)) {
                Some(next) => next <= now,
                None => true,
            },
        }
    }
}

/// Deterministic snapshot name for the given date.
pub fn snapshot_filename(date: NaiveDate) -> String {
    format!("repair-system-backup-{date}.json")
}
