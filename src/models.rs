pub mod appointment;
pub mod auth;
pub mod finance;
pub mod procedure;
pub mod product;
pub mod professional;
pub mod time_slot;
