// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "financial_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FinancialStatus {
    Pago,
    Pendente,
}

// --- Lançamento financeiro (somente leitura pela API) ---
// Gerado quando um agendamento é concluído.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntry {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "João da Silva")]
    pub client_name: String,

    #[schema(example = "Corte + Barba")]
    pub procedure_description: String,

    #[schema(example = "55.00")]
    pub amount: Decimal,

    pub status: FinancialStatus,

    pub created_at: DateTime<Utc>,
}
