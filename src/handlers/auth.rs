// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::{
        envelope::ApiEnvelope,
        error::{ApiError, AppError},
        extract::Json,
    },
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, SessionClaims},
        i18n::Locale,
    },
    models::auth::{AuthResponse, LoginUserPayload, SessionInfo},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let auth = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ApiEnvelope::ok(auth))))
}

// GET /api/auth/verify
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token válido", body = SessionInfo),
        (status = 401, description = "Token inválido, expirado ou revogado")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    Json(ApiEnvelope::ok(SessionInfo { user_id: user.id, email: user.email, role: user.role }))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão encerrada"),
        (status = 401, description = "Token inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    locale: Locale,
    SessionClaims(claims): SessionClaims,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .logout(&claims)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = if locale.is_english() { "Logged out." } else { "Sessão encerrada." };
    Ok(Json(ApiEnvelope::done(message)))
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Serviço no ar"))
)]
pub async fn health() -> impl IntoResponse {
    Json(ApiEnvelope::done("OK"))
}
