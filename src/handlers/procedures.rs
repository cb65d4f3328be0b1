// src/handlers/procedures.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        envelope::ApiEnvelope,
        error::{ApiError, AppError},
        extract::{Json, Path, Query},
    },
    config::AppState,
    middleware::{i18n::Locale, rbac::RequireAdmin},
    models::procedure::{NewProcedure, Procedure, ProcedurePatch, ProcedureQuery},
};

// GET /api/procedimento/getall
#[utoipa::path(
    get,
    path = "/api/procedimento/getall",
    tag = "Procedimentos",
    params(ProcedureQuery),
    responses((status = 200, description = "Lista de procedimentos", body = Vec<Procedure>))
)]
pub async fn list_procedures(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ProcedureQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let procedures = app_state
        .procedure_service
        .list(query.professional_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(procedures)))
}

// POST /api/procedimento/create
#[utoipa::path(
    post,
    path = "/api/procedimento/create",
    tag = "Procedimentos",
    request_body = NewProcedure,
    responses(
        (status = 201, description = "Procedimento criado", body = Procedure),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Profissional inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_procedure(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Json(payload): Json<NewProcedure>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let procedure = app_state
        .procedure_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(procedure))))
}

// PUT /api/procedimento/update/{id}
#[utoipa::path(
    put,
    path = "/api/procedimento/update/{id}",
    tag = "Procedimentos",
    params(("id" = Uuid, Path, description = "ID do procedimento")),
    request_body = ProcedurePatch,
    responses(
        (status = 200, description = "Procedimento atualizado", body = Procedure),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_procedure(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProcedurePatch>,
) -> Result<impl IntoResponse, ApiError> {
    patch
        .validate_fields()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let procedure = app_state
        .procedure_service
        .update(id, &patch)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(procedure)))
}

// DELETE /api/procedimento/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/procedimento/delete/{id}",
    tag = "Procedimentos",
    params(("id" = Uuid, Path, description = "ID do procedimento")),
    responses(
        (status = 200, description = "Removido"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Procedimento com agendamentos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_procedure(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .procedure_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let message = if locale.is_english() { "Procedure deleted." } else { "Procedimento removido." };
    Ok(Json(ApiEnvelope::done(message)))
}
