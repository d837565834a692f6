pub mod notification_id;
pub mod repair_id;
pub mod repair_number;

pub use notification_id::NotificationId;
pub use repair_id::RepairId;
pub use repair_number::RepairNumber;
