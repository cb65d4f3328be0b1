pub mod appointment_service;
pub mod auth;
pub mod finance_service;
pub mod procedure_service;
pub mod product_service;
pub mod professional_service;
pub mod schedule_service;
