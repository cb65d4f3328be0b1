// src/models/professional.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::procedure::Procedure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: Uuid,
    #[schema(example = "Carlos Barbeiro")]
    pub name: String,
    #[schema(example = "carlos@barbearia.com")]
    pub email: String,
    #[schema(example = "(11) 97777-6666")]
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profissional com os procedimentos que ele oferece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalDetail {
    #[serde(flatten)]
    pub professional: Professional,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProfessional {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalPatch {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfessionalDetail {
    pub fn apply_patch(&mut self, patch: &ProfessionalPatch) {
        if let Some(name) = &patch.name {
            self.professional.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.professional.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.professional.phone = phone.clone();
        }
    }
}
