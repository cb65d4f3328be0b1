pub mod dates;
pub mod envelope;
pub mod error;
pub mod extract;
