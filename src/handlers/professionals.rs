// src/handlers/professionals.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        envelope::ApiEnvelope,
        error::{ApiError, AppError},
        extract::{Json, Path},
    },
    config::AppState,
    middleware::{i18n::Locale, rbac::RequireAdmin},
    models::professional::{NewProfessional, Professional, ProfessionalDetail, ProfessionalPatch},
};

// GET /api/profissional/getall
#[utoipa::path(
    get,
    path = "/api/profissional/getall",
    tag = "Profissionais",
    responses((status = 200, description = "Lista de profissionais", body = Vec<Professional>))
)]
pub async fn list_professionals(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let professionals = app_state
        .professional_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(professionals)))
}

// GET /api/profissional/{id}
#[utoipa::path(
    get,
    path = "/api/profissional/{id}",
    tag = "Profissionais",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    responses(
        (status = 200, description = "Profissional com seus procedimentos", body = ProfessionalDetail),
        (status = 404, description = "Não encontrado")
    )
)]
pub async fn get_professional(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .professional_service
        .get_detail(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(detail)))
}

// POST /api/profissional/create
#[utoipa::path(
    post,
    path = "/api/profissional/create",
    tag = "Profissionais",
    request_body = NewProfessional,
    responses(
        (status = 201, description = "Profissional criado", body = Professional),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_professional(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Json(payload): Json<NewProfessional>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let professional = app_state
        .professional_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(professional))))
}

// PUT /api/profissional/update/{id}
#[utoipa::path(
    put,
    path = "/api/profissional/update/{id}",
    tag = "Profissionais",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    request_body = ProfessionalPatch,
    responses(
        (status = 200, description = "Profissional atualizado", body = ProfessionalDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_professional(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProfessionalPatch>,
) -> Result<impl IntoResponse, ApiError> {
    patch
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let detail = app_state
        .professional_service
        .update(id, &patch)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(detail)))
}

// DELETE /api/profissional/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/profissional/delete/{id}",
    tag = "Profissionais",
    params(("id" = Uuid, Path, description = "ID do profissional")),
    responses(
        (status = 200, description = "Removido"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Profissional com procedimentos ou agendamentos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_professional(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .professional_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let message = if locale.is_english() { "Professional deleted." } else { "Profissional removido." };
    Ok(Json(ApiEnvelope::done(message)))
}
