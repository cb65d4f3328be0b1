// src/common/envelope.rs

use serde::{Deserialize, Serialize};

/// Envelope único de resposta: `{ status, data?, message? }`.
///
/// Todas as rotas respondem com ele, inclusive os erros (`status: false`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { status: true, data: Some(data), message: None }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self { status: true, data: Some(data), message: Some(message.into()) }
    }
}

impl ApiEnvelope<()> {
    /// Resposta sem corpo (ex.: remoções).
    pub fn done(message: impl Into<String>) -> Self {
        Self { status: true, data: None, message: Some(message.into()) }
    }
}
