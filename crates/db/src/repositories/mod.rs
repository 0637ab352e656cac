//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Operations that must be atomic
//! open their own transaction.

pub mod booking_repo;
pub mod dashboard_repo;
pub mod machine_repo;
pub mod maintenance_repo;
pub mod payment_slip_repo;
pub mod role_repo;
pub mod session_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use booking_repo::{BookingInsert, BookingRepo};
pub use dashboard_repo::DashboardRepo;
pub use machine_repo::MachineRepo;
pub use maintenance_repo::{CompletionOutcome, MaintenanceRepo, RepairCompletion};
pub use payment_slip_repo::PaymentSlipRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use ticket_repo::{TicketRepo, TicketResponseRepo};
pub use user_repo::UserRepo;
