pub mod notification_scan_job;

pub use notification_scan_job::NotificationScanJob;
