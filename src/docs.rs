// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::{domain, handlers, models};

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health / Auth ---
        handlers::auth::health,
        handlers::auth::login,
        handlers::auth::verify,
        handlers::auth::logout,

        // --- Agendamentos ---
        handlers::appointments::list_appointments,
        handlers::appointments::get_appointment,
        handlers::appointments::create_appointment,
        handlers::appointments::update_appointment,
        handlers::appointments::delete_appointment,
        handlers::appointments::available_slots,

        // --- Horários ---
        handlers::time_slots::list_slots,
        handlers::time_slots::create_batch,
        handlers::time_slots::create_individual,
        handlers::time_slots::update_slot,
        handlers::time_slots::delete_slot,
        handlers::time_slots::slots_by_professional,

        // --- Profissionais ---
        handlers::professionals::list_professionals,
        handlers::professionals::get_professional,
        handlers::professionals::create_professional,
        handlers::professionals::update_professional,
        handlers::professionals::delete_professional,

        // --- Procedimentos ---
        handlers::procedures::list_procedures,
        handlers::procedures::create_procedure,
        handlers::procedures::update_procedure,
        handlers::procedures::delete_procedure,

        // --- Produtos ---
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Financeiro ---
        handlers::finance::list_entries,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::SessionInfo,

            // --- Agendamentos ---
            models::appointment::AppointmentStatus,
            models::appointment::Appointment,
            models::appointment::NewAppointment,
            models::appointment::AppointmentPatch,
            models::appointment::UpdateAppointmentPayload,

            // --- Horários ---
            models::time_slot::TimeSlot,
            models::time_slot::NewTimeSlot,
            models::time_slot::NewTimeSlotBatch,
            models::time_slot::TimeSlotPatch,
            domain::views::ProfessionalSchedule,
            domain::views::DaySchedule,

            // --- Catálogo ---
            models::professional::Professional,
            models::professional::ProfessionalDetail,
            models::professional::NewProfessional,
            models::professional::ProfessionalPatch,
            models::procedure::Procedure,
            models::procedure::NewProcedure,
            models::procedure::ProcedurePatch,

            // --- Produtos ---
            models::product::ProductStatus,
            models::product::Product,
            models::product::NewProduct,
            models::product::ProductPatch,

            // --- Financeiro ---
            models::finance::FinancialStatus,
            models::finance::FinancialEntry,
            domain::ledger::LedgerSort,
            domain::ledger::LedgerSummary,
            domain::ledger::LedgerView,
        )
    ),
    tags(
        (name = "Health", description = "Verificação do serviço"),
        (name = "Auth", description = "Login, verificação e logout"),
        (name = "Agendamentos", description = "Agendamentos de clientes"),
        (name = "Horários", description = "Agenda de horários dos profissionais"),
        (name = "Profissionais", description = "Cadastro de profissionais"),
        (name = "Procedimentos", description = "Serviços oferecidos e preços"),
        (name = "Produtos", description = "Produtos e seu ciclo de status"),
        (name = "Financeiro", description = "Lançamentos gerados pelos atendimentos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/appointment/all",
            "/api/horario/create-individual",
            "/api/profissional/{id}",
            "/api/procedimento/getall",
            "/api/produto/update/{id}",
            "/api/financeiro/getall",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {path}");
        }
    }
}
