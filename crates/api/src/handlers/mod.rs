pub mod account;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod machines;
pub mod maintenance;
pub mod payment_slips;
pub mod reference;
pub mod tickets;
