// src/models/appointment.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::dates::{hhmm, lenient_date};

// --- Status do Agendamento ---
// Os rótulos são exatamente os exibidos no painel (e gravados no Postgres).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status")]
pub enum AppointmentStatus {
    #[serde(rename = "Pendente")]
    #[sqlx(rename = "Pendente")]
    Pendente,
    #[serde(rename = "Agendado")]
    #[sqlx(rename = "Agendado")]
    Agendado,
    #[serde(rename = "Em Andamento")]
    #[sqlx(rename = "Em Andamento")]
    EmAndamento,
    #[serde(rename = "Concluído")]
    #[sqlx(rename = "Concluído")]
    Concluido,
    #[serde(rename = "Cancelado")]
    #[sqlx(rename = "Cancelado")]
    Cancelado,
    #[serde(rename = "Não Compareceu")]
    #[sqlx(rename = "Não Compareceu")]
    NaoCompareceu,
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Pendente
    }
}

impl AppointmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Pendente => "Pendente",
            AppointmentStatus::Agendado => "Agendado",
            AppointmentStatus::EmAndamento => "Em Andamento",
            AppointmentStatus::Concluido => "Concluído",
            AppointmentStatus::Cancelado => "Cancelado",
            AppointmentStatus::NaoCompareceu => "Não Compareceu",
        }
    }

    /// Status que devolvem o horário reservado para a agenda.
    pub fn releases_slot(self) -> bool {
        matches!(self, AppointmentStatus::Cancelado | AppointmentStatus::NaoCompareceu)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// --- Agendamento ---
// Nome/preço do procedimento e nome do profissional são "fotografados" no momento
// da criação, para o histórico não mudar quando o catálogo mudar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,

    #[schema(example = "João da Silva")]
    pub client_name: String,

    #[schema(example = "(11) 98888-7777")]
    pub client_phone: String,

    pub client_email: Option<String>,

    #[serde(with = "lenient_date")]
    #[schema(value_type = String, format = Date, example = "2024-05-10")]
    pub date: NaiveDate,

    pub time_slot_id: Option<Uuid>,

    #[serde(default, with = "hhmm::option")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub start_time: Option<NaiveTime>,

    #[serde(default, with = "hhmm::option")]
    #[schema(value_type = Option<String>, example = "09:30")]
    pub end_time: Option<NaiveTime>,

    pub procedure_id: Uuid,

    #[schema(example = "Corte + Barba")]
    pub procedure_name: String,

    #[schema(example = "55.00")]
    pub procedure_price: Decimal,

    pub professional_id: Uuid,

    #[schema(example = "Carlos Barbeiro")]
    pub professional_name: String,

    pub status: AppointmentStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Aplica os campos presentes no patch. Os snapshots (nomes/preço) e o
    /// vínculo com o horário ficam a cargo de quem conhece o catálogo.
    pub fn apply_patch(&mut self, patch: &AppointmentPatch) {
        if let Some(name) = &patch.client_name {
            self.client_name = name.clone();
        }
        if let Some(phone) = &patch.client_phone {
            self.client_phone = phone.clone();
        }
        if let Some(email) = &patch.client_email {
            self.client_email = Some(email.clone());
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(start) = patch.start_time {
            self.start_time = Some(start);
        }
        if let Some(end) = patch.end_time {
            self.end_time = Some(end);
        }
        if let Some(procedure_id) = patch.procedure_id {
            self.procedure_id = procedure_id;
        }
        if let Some(professional_id) = patch.professional_id {
            self.professional_id = professional_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    /// Profissional, dia ou horário diferentes dos de `other`.
    pub fn schedule_differs(&self, other: &Appointment) -> bool {
        self.professional_id != other.professional_id
            || self.date != other.date
            || self.start_time != other.start_time
            || self.end_time != other.end_time
    }
}

// --- Payload de criação (formulário do cliente ou do admin) ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "João da Silva")]
    pub client_name: String,

    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    #[schema(example = "(11) 98888-7777")]
    pub client_phone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,

    #[serde(with = "lenient_date")]
    #[schema(value_type = String, format = Date, example = "2024-05-10")]
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot_id: Option<Uuid>,

    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub start_time: Option<NaiveTime>,

    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "09:30")]
    pub end_time: Option<NaiveTime>,

    pub procedure_id: Uuid,
    pub professional_id: Uuid,

    // O formulário do admin pode já criar como "Agendado"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl NewAppointment {
    /// Regras que envolvem mais de um campo.
    pub fn validate_consistency(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.time_slot_id.is_none() && self.start_time.is_none() {
            let mut err = ValidationError::new("required");
            err.message = Some("Informe um horário disponível ou o horário de início.".into());
            errors.add("timeSlotId", err);
        }

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                let mut err = ValidationError::new("range");
                err.message = Some("O horário final deve ser posterior ao inicial.".into());
                errors.add("endTime", err);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// --- Patch (edição parcial) ---
// Só os campos presentes são enviados; uma troca de status manda apenas `status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,

    #[serde(default, with = "lenient_date::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,

    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,

    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,

    // Troca de horário: o serviço reserva o novo e devolve o antigo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot_id: Option<Uuid>,
}

impl AppointmentPatch {
    pub fn status_only(status: AppointmentStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn validate_fields(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if matches!(&self.client_name, Some(n) if n.trim().is_empty()) {
            let mut err = ValidationError::new("length");
            err.message = Some("O nome do cliente é obrigatório.".into());
            errors.add("clientName", err);
        }
        if matches!(&self.client_phone, Some(p) if p.trim().is_empty()) {
            let mut err = ValidationError::new("length");
            err.message = Some("O telefone é obrigatório.".into());
            errors.add("clientPhone", err);
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                let mut err = ValidationError::new("range");
                err.message = Some("O horário final deve ser posterior ao inicial.".into());
                errors.add("endTime", err);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Corpo do `PUT /appointment/update`: o id vai junto com os campos.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentPayload {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: AppointmentPatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_appointment() -> NewAppointment {
        serde_json::from_value(json!({
            "clientName": "Ana",
            "clientPhone": "1199999",
            "date": "2024-05-10T00:00:00.000Z",
            "startTime": "09:00",
            "procedureId": Uuid::nil(),
            "professionalId": Uuid::nil(),
        }))
        .unwrap()
    }

    #[test]
    fn status_labels_round_trip_through_json() {
        let value = serde_json::to_value(AppointmentStatus::NaoCompareceu).unwrap();
        assert_eq!(value, json!("Não Compareceu"));
        let back: AppointmentStatus = serde_json::from_value(json!("Em Andamento")).unwrap();
        assert_eq!(back, AppointmentStatus::EmAndamento);
    }

    #[test]
    fn iso_date_in_payload_is_truncated_to_day() {
        let payload = new_appointment();
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert!(payload.validate().is_ok());
        assert!(payload.validate_consistency().is_ok());
    }

    #[test]
    fn payload_without_slot_or_start_is_inconsistent() {
        let mut payload = new_appointment();
        payload.start_time = None;
        let errors = payload.validate_consistency().unwrap_err();
        assert!(errors.field_errors().contains_key("timeSlotId"));
    }

    #[test]
    fn status_only_patch_serializes_just_the_status() {
        let value = serde_json::to_value(AppointmentPatch::status_only(AppointmentStatus::Concluido)).unwrap();
        assert_eq!(value, json!({ "status": "Concluído" }));
    }

    #[test]
    fn update_payload_flattens_patch_fields() {
        let payload: UpdateAppointmentPayload = serde_json::from_value(json!({
            "id": Uuid::nil(),
            "status": "Agendado",
            "clientName": "Bruno"
        }))
        .unwrap();
        assert_eq!(payload.patch.status, Some(AppointmentStatus::Agendado));
        assert_eq!(payload.patch.client_name.as_deref(), Some("Bruno"));
    }
}
