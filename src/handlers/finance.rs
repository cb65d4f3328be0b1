// src/handlers/finance.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{envelope::ApiEnvelope, error::ApiError, extract::{Json, Query}},
    config::AppState,
    domain::ledger::{LedgerQuery, LedgerView},
    middleware::{i18n::Locale, rbac::RequireAdmin},
};

// GET /api/financeiro/getall?status=&busca=&ordem=
#[utoipa::path(
    get,
    path = "/api/financeiro/getall",
    tag = "Financeiro",
    params(LedgerQuery),
    responses(
        (status = 200, description = "Lançamentos filtrados e totais", body = LedgerView),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Query(query): Query<LedgerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .finance_service
        .ledger(&query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(view)))
}
