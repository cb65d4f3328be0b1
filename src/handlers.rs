pub mod appointments;
pub mod auth;
pub mod finance;
pub mod procedures;
pub mod products;
pub mod professionals;
pub mod time_slots;
