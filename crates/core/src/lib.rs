//! Domain types and business rules for the equipment-rental service.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers call
//! into these functions so the same rules apply everywhere.

pub mod availability;
pub mod booking;
pub mod error;
pub mod maintenance;
pub mod payment;
pub mod roles;
pub mod status;
pub mod ticket;
pub mod types;
