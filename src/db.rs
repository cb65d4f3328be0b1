pub mod user_repo;
pub use user_repo::UserRepository;
pub mod professional_repo;
pub use professional_repo::ProfessionalRepository;
pub mod procedure_repo;
pub use procedure_repo::ProcedureRepository;
pub mod time_slot_repo;
pub use time_slot_repo::TimeSlotRepository;
pub mod appointment_repo;
pub use appointment_repo::AppointmentRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
