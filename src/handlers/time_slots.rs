// src/handlers/time_slots.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::{
        envelope::ApiEnvelope,
        error::{ApiError, AppError},
        extract::{Json, Path, Query},
    },
    config::AppState,
    domain::views::SlotFilter,
    middleware::{
        i18n::Locale,
        rbac::{RequireAdmin, RequireStaff},
    },
    models::time_slot::{NewTimeSlot, NewTimeSlotBatch, TimeSlot, TimeSlotPatch},
};

// GET /api/horario/getall
#[utoipa::path(
    get,
    path = "/api/horario/getall",
    tag = "Horários",
    params(SlotFilter),
    responses(
        (status = 200, description = "Horários (filtrados)", body = Vec<TimeSlot>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_slots(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireStaff,
    Query(filter): Query<SlotFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let slots = app_state
        .schedule_service
        .list(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(slots)))
}

// POST /api/horario/create (geração em lote)
#[utoipa::path(
    post,
    path = "/api/horario/create",
    tag = "Horários",
    request_body = NewTimeSlotBatch,
    responses(
        (status = 201, description = "Horários gerados", body = Vec<TimeSlot>),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Horário duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Json(payload): Json<NewTimeSlotBatch>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.slots.is_empty() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("Informe ao menos um horário.".into());
        errors.add("slots", err);
        return Err(AppError::ValidationError(errors).to_api_error(&locale));
    }
    for slot in &payload.slots {
        slot.validate_interval()
            .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;
    }

    let created = app_state
        .schedule_service
        .create_batch(&payload.slots)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(created))))
}

// POST /api/horario/create-individual
#[utoipa::path(
    post,
    path = "/api/horario/create-individual",
    tag = "Horários",
    request_body = NewTimeSlot,
    responses(
        (status = 201, description = "Horário criado", body = TimeSlot),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Horário duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_individual(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Json(payload): Json<NewTimeSlot>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate_interval()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let slot = app_state
        .schedule_service
        .create_one(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(slot))))
}

// PUT /api/horario/update/{id}
#[utoipa::path(
    put,
    path = "/api/horario/update/{id}",
    tag = "Horários",
    params(("id" = Uuid, Path, description = "ID do horário")),
    request_body = TimeSlotPatch,
    responses(
        (status = 200, description = "Horário atualizado", body = TimeSlot),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_slot(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(patch): Json<TimeSlotPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let slot = app_state
        .schedule_service
        .update(id, &patch)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(slot)))
}

// DELETE /api/horario/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/horario/delete/{id}",
    tag = "Horários",
    params(("id" = Uuid, Path, description = "ID do horário")),
    responses(
        (status = 200, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_slot(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .schedule_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let message = if locale.is_english() { "Time slot deleted." } else { "Horário removido." };
    Ok(Json(ApiEnvelope::done(message)))
}

// GET /api/horario/barbeiro/{id} (público)
#[utoipa::path(
    get,
    path = "/api/horario/barbeiro/{id}",
    tag = "Horários",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    responses((status = 200, description = "Horários livres a partir de hoje", body = Vec<TimeSlot>))
)]
pub async fn slots_by_professional(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let slots = app_state
        .schedule_service
        .open_slots_for(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(slots)))
}
