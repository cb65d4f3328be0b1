// src/common/extract.rs
//
// `Json`, `Query` e `Path` com rejeição no envelope de erro da API
// (400 + `details` com o campo), no idioma do `Accept-Language`.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    common::error::{ApiError, AppError},
    middleware::i18n::Locale,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

fn malformed(headers: &HeaderMap, field: &str, reason: impl Into<String>) -> ApiError {
    let err = AppError::MalformedRequest { field: field.to_string(), reason: reason.into() };
    tracing::debug!("{}", err);
    err.to_api_error(&Locale::from_headers(headers))
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let essence = value.split(';').next().unwrap_or_default().trim();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        if !has_json_content_type(&headers) {
            return Err(malformed(&headers, "body", "Content-Type deve ser application/json"));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| malformed(&headers, "body", rejection.body_text()))?;

        let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
        let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            // caminho vazio (".") = erro de sintaxe no documento inteiro
            let path = err.path().to_string();
            let field = if path == "." { "body" } else { path.as_str() };
            malformed(&headers, field, err.inner().to_string())
        })?;
        deserializer
            .end()
            .map_err(|err| malformed(&headers, "body", err.to_string()))?;

        Ok(Json(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(malformed(&parts.headers, "query", rejection.body_text())),
        }
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => Err(malformed(&parts.headers, "path", rejection.body_text())),
        }
    }
}
