// src/common/error.rs

use std::collections::HashMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::{domain::lifecycle::TransitionError, middleware::i18n::Locale};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo, query ou path que não desserializa; `field` é o caminho do campo
    #[error("Requisição malformada em '{field}': {reason}")]
    MalformedRequest { field: String, reason: String },

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Acesso negado")]
    Forbidden,

    // O argumento é o nome da entidade ("Agendamento", "Horário", ...)
    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Profissional possui procedimentos ou agendamentos vinculados")]
    ProfessionalInUse,

    #[error("Procedimento possui agendamentos vinculados")]
    ProcedureInUse,

    #[error("Horário indisponível")]
    SlotUnavailable,

    #[error("Horário já cadastrado para este profissional")]
    SlotAlreadyExists,

    #[error("O procedimento não pertence ao profissional informado")]
    ProcedureMismatch,

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Erro já traduzido e pronto para virar resposta HTTP.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "status": false, "message": self.message });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| match &e.message {
                Some(m) => m.to_string(),
                None => e.code.to_string(),
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    json!(details)
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Transition(TransitionError::PendingUserRequired) => StatusCode::BAD_REQUEST,
            AppError::Transition(TransitionError::UnknownToken(_)) => StatusCode::NOT_FOUND,
            AppError::Transition(_)
            | AppError::ProfessionalInUse
            | AppError::ProcedureInUse
            | AppError::SlotUnavailable
            | AppError::SlotAlreadyExists => StatusCode::CONFLICT,
            AppError::ProcedureMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Traduz o erro para o idioma pedido no `Accept-Language`.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let en = locale.is_english();
        let status = self.status_code();

        let message: String = match self {
            AppError::ValidationError(errors) => {
                return ApiError {
                    status,
                    message: pick(en, "Um ou mais campos são inválidos.", "One or more fields are invalid.").into(),
                    details: Some(validation_details(errors)),
                };
            }
            AppError::MalformedRequest { field, reason } => {
                return ApiError {
                    status,
                    message: pick(en, "Requisição malformada.", "Malformed request.").into(),
                    details: Some(json!({ field.as_str(): [reason] })),
                };
            }
            AppError::InvalidCredentials => pick(en, "E-mail ou senha inválidos.", "Invalid e-mail or password.").into(),
            AppError::InvalidToken => pick(
                en,
                "Token de autenticação inválido ou ausente.",
                "Missing or invalid authentication token.",
            )
            .into(),
            AppError::UserNotFound => pick(en, "Usuário não encontrado.", "User not found.").into(),
            AppError::Forbidden => pick(
                en,
                "Você não tem permissão para realizar esta ação.",
                "You are not allowed to perform this action.",
            )
            .into(),
            AppError::NotFound(entity) => {
                if en {
                    format!("{} not found.", entity)
                } else {
                    format!("{} não encontrado.", entity)
                }
            }
            AppError::Transition(err) => transition_message(err, en),
            AppError::ProfessionalInUse => pick(
                en,
                "Não é possível remover: o profissional possui procedimentos ou agendamentos vinculados.",
                "Cannot delete: the professional still has procedures or appointments.",
            )
            .into(),
            AppError::ProcedureInUse => pick(
                en,
                "Não é possível remover: o procedimento possui agendamentos vinculados.",
                "Cannot delete: the procedure is referenced by appointments.",
            )
            .into(),
            AppError::SlotUnavailable => pick(
                en,
                "O horário escolhido não está mais disponível.",
                "The selected time slot is no longer available.",
            )
            .into(),
            AppError::SlotAlreadyExists => pick(
                en,
                "Já existe um horário com este início para o profissional.",
                "A slot with this start time already exists for the professional.",
            )
            .into(),
            AppError::ProcedureMismatch => pick(
                en,
                "O procedimento não pertence ao profissional informado.",
                "The procedure does not belong to the given professional.",
            )
            .into(),
            AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                pick(en, "Registro não encontrado.", "Record not found.").into()
            }
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                pick(en, "Ocorreu um erro inesperado.", "An unexpected error occurred.").into()
            }
        };

        ApiError { status, message, details: None }
    }
}

fn pick(en: bool, pt: &'static str, english: &'static str) -> &'static str {
    if en { english } else { pt }
}

fn transition_message(err: &TransitionError, en: bool) -> String {
    if !en {
        return err.to_string();
    }
    match err {
        TransitionError::Terminal(status) => {
            format!("Status '{}' is final and cannot be changed.", status)
        }
        TransitionError::NotAllowed { from, to } => {
            format!("Transition from '{}' to '{}' is not allowed.", from, to)
        }
        TransitionError::PendingUserRequired => {
            "A responsible user is required for pending products.".into()
        }
        TransitionError::UnknownToken(token) => {
            format!("Confirmation '{}' does not exist or was already used.", token)
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error(&Locale::default())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
