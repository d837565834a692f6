pub mod backup;
pub mod notification;
pub mod printer;
pub mod repair;
pub mod session;

pub use backup::{snapshot_filename, BackupFrequency, BackupSettings};
pub use notification::{AlertKind, Notification};
pub use printer::PrinterSettings;
pub use repair::{Client, Repair, RepairDraft, RepairPatch, RepairStatus};
pub use session::Session;
