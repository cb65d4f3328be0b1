// src/models/time_slot.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::common::dates::{hhmm, lenient_date};

// --- Horário (disponibilidade de um profissional num dia) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub professional_id: Uuid,

    // Vem do JOIN com `professionals`; não é gravado na tabela de horários
    #[serde(default)]
    #[schema(example = "Carlos Barbeiro")]
    pub professional_name: String,

    #[serde(with = "lenient_date")]
    #[schema(value_type = String, format = Date, example = "2024-05-10")]
    pub date: NaiveDate,

    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,

    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:30")]
    pub end_time: NaiveTime,

    #[schema(example = true)]
    pub available: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeSlot {
    pub professional_id: Uuid,

    #[serde(with = "lenient_date")]
    #[schema(value_type = String, format = Date, example = "2024-05-10")]
    pub date: NaiveDate,

    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:00")]
    pub start_time: NaiveTime,

    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:30")]
    pub end_time: NaiveTime,
}

impl NewTimeSlot {
    pub fn validate_interval(&self) -> Result<(), ValidationErrors> {
        if self.start_time < self.end_time {
            return Ok(());
        }
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("O horário final deve ser posterior ao inicial.".into());
        errors.add("endTime", err);
        Err(errors)
    }
}

/// Lote do `POST /horario/create` (a "geração" feita pelo admin).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeSlotBatch {
    pub slots: Vec<NewTimeSlot>,
}

/// O único campo mutável de um horário é a disponibilidade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotPatch {
    pub available: bool,
}

impl TimeSlot {
    pub fn apply_patch(&mut self, patch: &TimeSlotPatch) {
        self.available = patch.available;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inverted_interval_is_rejected() {
        let slot: NewTimeSlot = serde_json::from_value(json!({
            "professionalId": Uuid::nil(),
            "date": "2024-05-10",
            "startTime": "10:00",
            "endTime": "09:30",
        }))
        .unwrap();
        let errors = slot.validate_interval().unwrap_err();
        assert!(errors.field_errors().contains_key("endTime"));
    }

    #[test]
    fn times_serialize_without_seconds() {
        let slot = NewTimeSlot {
            professional_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        };
        let value = serde_json::to_value(slot).unwrap();
        assert_eq!(value["startTime"], json!("09:00"));
        assert_eq!(value["date"], json!("2024-05-10"));
    }
}
