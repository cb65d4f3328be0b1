// src/client/error.rs

use thiserror::Error;

use crate::domain::lifecycle::TransitionError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Falha de comunicação com o servidor: {0}")]
    Transport(#[from] reqwest::Error),

    /// Resposta não-2xx; `message` vem do envelope quando existe.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Resposta inesperada do servidor: {0}")]
    Decode(String),

    #[error("Faça login para continuar.")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Conflito de estado devolvido pelo servidor (409).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
