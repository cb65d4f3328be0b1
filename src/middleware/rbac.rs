// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{ROLE_ADMIN, ROLE_PROFESSIONAL},
};

/// 1. O Trait que define quais papéis passam pelo guardião
pub trait RoleDef: Send + Sync + 'static {
    fn allowed() -> &'static [&'static str];
}

/// 2. O Extractor (Guardião). Depende do `auth_guard` ter rodado antes.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = match Locale::from_request_parts(parts, state).await {
            Ok(locale) => locale,
            Err(never) => match never {},
        };

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale))?;

        if !T::allowed().contains(&user.0.role.as_str()) {
            tracing::warn!("Acesso negado a {} (papel '{}')", user.0.email, user.0.role);
            return Err(AppError::Forbidden.to_api_error(&locale));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allowed() -> &'static [&'static str] {
        &[ROLE_ADMIN]
    }
}

/// Administrador ou profissional (o painel da equipe).
pub struct Staff;
impl RoleDef for Staff {
    fn allowed() -> &'static [&'static str] {
        &[ROLE_ADMIN, ROLE_PROFESSIONAL]
    }
}

pub type RequireAdmin = RequireRole<AdminOnly>;
pub type RequireStaff = RequireRole<Staff>;
