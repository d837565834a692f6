pub mod auth_service;
pub mod backup_service;
pub mod notification_service;
pub mod repair_service;
pub mod ticket_service;

pub use auth_service::AuthService;
pub use backup_service::BackupService;
pub use notification_service::NotificationService;
pub use repair_service::{ExportDocument, RepairService};
pub use ticket_service::{render_ticket, TicketService};
