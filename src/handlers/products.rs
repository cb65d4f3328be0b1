// src/handlers/products.rs

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
    models::product::{NewProduct, Product, ProductPatch},
};

// GET /api/produto/getall
#[utoipa::path(
    get,
    path = "/api/produto/getall",
    tag = "Produtos",
    responses((status = 200, description = "Lista de produtos", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(products)))
}

// POST /api/produto/create
#[utoipa::path(
    post,
    path = "/api/produto/create",
    tag = "Produtos",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .and_then(|_| payload.validate_consistency())
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .product_service
        .create(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(product))))
}

// PUT /api/produto/update/{id}
#[utoipa::path(
    put,
    path = "/api/produto/update/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 400, description = "Responsável obrigatório para produto pendente"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Transição de status não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> Result<impl IntoResponse, ApiError> {
    patch
        .validate_fields()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .product_service
        .update(id, &patch)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(ApiEnvelope::ok(product)))
}

// DELETE /api/produto/delete/{id}
#[utoipa::path(
    delete,
    path = "/api/produto/delete/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .product_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let message = if locale.is_english() { "Product deleted." } else { "Produto removido." };
    Ok(Json(ApiEnvelope::done(message)))
}
