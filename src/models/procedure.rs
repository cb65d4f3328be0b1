// src/models/procedure.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Procedimento (serviço oferecido por um profissional) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: Uuid,
    #[schema(example = "Corte degradê")]
    pub name: String,
    #[schema(example = "45.00")]
    pub price: Decimal,
    pub professional_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProcedure {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    pub professional_id: Uuid,
}

/// Filtro do `GET /procedimento/getall`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProcedureQuery {
    /// Só os procedimentos deste profissional
    #[serde(default, rename = "profissional", skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcedurePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<Uuid>,
}

impl ProcedurePatch {
    pub fn validate_fields(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            let mut err = ValidationError::new("length");
            err.message = Some("O nome é obrigatório.".into());
            errors.add("name", err);
        }
        if let Some(price) = &self.price {
            if let Err(err) = validate_not_negative(price) {
                errors.add("price", err);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Procedure {
    pub fn apply_patch(&mut self, patch: &ProcedurePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(professional_id) = patch.professional_id {
            self.professional_id = professional_id;
        }
    }
}
