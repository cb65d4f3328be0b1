// src/handlers/appointments.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{
        dates::normalize_date,
        envelope::ApiEnvelope,
        error::{ApiError, AppError},
        extract::{Json, Path, Query},
    },
    config::AppState,
    domain::views::AppointmentFilter,
    middleware::{
        i18n::Locale,
        rbac::{RequireAdmin, RequireStaff},
    },
    models::{
        appointment::{Appointment, NewAppointment, UpdateAppointmentPayload},
        time_slot::TimeSlot,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// ID do profissional
    pub barbeiro: Option<String>,
    /// Dia (`YYYY-MM-DD` ou ISO)
    pub data: Option<String>,
}

// GET /api/appointment/all
#[utoipa::path(
    get,
    path = "/api/appointment/all",
    tag = "Agendamentos",
    params(AppointmentFilter),
    responses(
        (status = 200, description = "Agendamentos (filtrados)", body = Vec<Appointment>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_appointments(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireStaff,
    Query(filter): Query<AppointmentFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let appointments = app_state
        .appointment_service
        .list(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(appointments)))
}

// GET /api/appointment/{id}
#[utoipa::path(
    get,
    path = "/api/appointment/{id}",
    tag = "Agendamentos",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento", body = Appointment),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = app_state
        .appointment_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(appointment)))
}

// POST /api/appointment/create (público: formulário do cliente)
#[utoipa::path(
    post,
    path = "/api/appointment/create",
    tag = "Agendamentos",
    request_body = NewAppointment,
    responses(
        (status = 201, description = "Agendamento criado", body = Appointment),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Horário indisponível")
    )
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<NewAppointment>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .and_then(|_| payload.validate_consistency())
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let appointment = app_state
        .appointment_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = if locale.is_english() { "Appointment created." } else { "Agendamento criado." };
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok_with_message(appointment, message))))
}

// PUT /api/appointment/update (o id vai no corpo)
#[utoipa::path(
    put,
    path = "/api/appointment/update",
    tag = "Agendamentos",
    request_body = UpdateAppointmentPayload,
    responses(
        (status = 200, description = "Agendamento atualizado", body = Appointment),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Transição de status não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireStaff,
    Json(payload): Json<UpdateAppointmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .patch
        .validate_fields()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let appointment = app_state
        .appointment_service
        .update(payload.id, &payload.patch)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(appointment)))
}

// DELETE /api/appointment/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/appointment/delete/{id}",
    tag = "Agendamentos",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .appointment_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let message = if locale.is_english() { "Appointment deleted." } else { "Agendamento removido." };
    Ok(Json(ApiEnvelope::done(message)))
}

// GET /api/appointment/horarios-disponiveis?barbeiro=&data=
#[utoipa::path(
    get,
    path = "/api/appointment/horarios-disponiveis",
    tag = "Agendamentos",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Horários livres do profissional no dia", body = Vec<TimeSlot>),
        (status = 400, description = "Parâmetros inválidos")
    )
)]
pub async fn available_slots(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = ValidationErrors::new();

    let professional_id = query.barbeiro.as_deref().and_then(|raw| Uuid::parse_str(raw.trim()).ok());
    if professional_id.is_none() {
        let mut err = ValidationError::new("required");
        err.message = Some("Informe um profissional válido.".into());
        errors.add("barbeiro", err);
    }
    let date = query.data.as_deref().and_then(normalize_date);
    if date.is_none() {
        let mut err = ValidationError::new("date");
        err.message = Some("Informe uma data válida (AAAA-MM-DD).".into());
        errors.add("data", err);
    }

    let (Some(professional_id), Some(date)) = (professional_id, date) else {
        return Err(AppError::ValidationError(errors).to_api_error(&locale));
    };

    let slots = app_state
        .schedule_service
        .available(professional_id, date)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(slots)))
}
