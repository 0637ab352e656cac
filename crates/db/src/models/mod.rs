//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where rows are editable
//!
//! Status columns are decoded straight into the `rentfleet_core::status`
//! enums via `#[sqlx(try_from = "i16")]`.

pub mod booking;
pub mod dashboard;
pub mod machine;
pub mod maintenance;
pub mod payment_slip;
pub mod role;
pub mod session;
pub mod ticket;
pub mod user;
