// src/domain/views.rs
//
// Filtros e agrupamentos das listas de agendamentos e horários. Recalculados a
// cada mudança de estado; usados tanto pelo painel quanto pelas rotas de listagem.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::IntoDeserializer};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::dates::{format_date_label, format_time, normalize_date},
    models::{
        appointment::{Appointment, AppointmentStatus},
        time_slot::TimeSlot,
    },
};

pub const ALL_STATUSES: &str = "todos";

/// Filtro por status: `todos` (ou vazio) não filtra; qualquer outro valor
/// precisa casar exatamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<T> {
    Todos,
    Only(T),
}

impl<T> Default for StatusFilter<T> {
    fn default() -> Self {
        StatusFilter::Todos
    }
}

impl<T: PartialEq> StatusFilter<T> {
    pub fn matches(&self, status: &T) -> bool {
        match self {
            StatusFilter::Todos => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for StatusFilter<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_STATUSES {
            return Ok(StatusFilter::Todos);
        }
        let inner: serde::de::value::StringDeserializer<serde::de::value::Error> =
            trimmed.to_string().into_deserializer();
        T::deserialize(inner)
            .map(StatusFilter::Only)
            .map_err(serde::de::Error::custom)
    }
}

impl<T: Serialize> Serialize for StatusFilter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusFilter::Todos => serializer.serialize_str(ALL_STATUSES),
            StatusFilter::Only(value) => value.serialize(serializer),
        }
    }
}

/// Compara datas já normalizadas para `YYYY-MM-DD`. Filtro vazio não filtra;
/// um filtro que não é data só casa com o texto idêntico (ou seja, com nada).
pub fn date_matches(filter: Option<&str>, record: &NaiveDate) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(raw) => match normalize_date(raw) {
            Some(day) => day == *record,
            None => raw == record.format("%Y-%m-%d").to_string(),
        },
    }
}

// ---
// Agendamentos
// ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentFilter {
    /// `todos` ou um status exato
    #[serde(default)]
    #[param(value_type = Option<String>, example = "Agendado")]
    pub status: StatusFilter<AppointmentStatus>,

    /// `YYYY-MM-DD` ou ISO completo
    #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, rename = "profissional", skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<Uuid>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.status.matches(&appointment.status)
            && date_matches(self.date.as_deref(), &appointment.date)
            && self
                .professional_id
                .is_none_or(|id| id == appointment.professional_id)
    }

    pub fn apply(&self, appointments: &[Appointment]) -> Vec<Appointment> {
        appointments.iter().filter(|a| self.matches(a)).cloned().collect()
    }
}

// ---
// Horários
// ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotFilter {
    #[serde(default, rename = "profissional", skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<Uuid>,

    #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, rename = "disponivel", skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl SlotFilter {
    pub fn matches(&self, slot: &TimeSlot) -> bool {
        self.professional_id.is_none_or(|id| id == slot.professional_id)
            && date_matches(self.date.as_deref(), &slot.date)
            && self.available.is_none_or(|flag| flag == slot.available)
    }

    pub fn apply(&self, slots: &[TimeSlot]) -> Vec<TimeSlot> {
        slots.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    /// `dd/mm/aaaa`
    pub label: String,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalSchedule {
    pub professional_name: String,
    pub days: Vec<DaySchedule>,
}

/// Agrupa: nome do profissional → data → horários em ordem de início.
pub fn group_slots(slots: &[TimeSlot]) -> Vec<ProfessionalSchedule> {
    let mut grouped: BTreeMap<&str, BTreeMap<NaiveDate, Vec<TimeSlot>>> = BTreeMap::new();
    for slot in slots {
        grouped
            .entry(slot.professional_name.as_str())
            .or_default()
            .entry(slot.date)
            .or_default()
            .push(slot.clone());
    }

    grouped
        .into_iter()
        .map(|(name, days)| ProfessionalSchedule {
            professional_name: name.to_string(),
            days: days
                .into_iter()
                .map(|(date, mut slots)| {
                    slots.sort_by_key(|s| format_time(&s.start_time));
                    DaySchedule { date, label: format_date_label(&date), slots }
                })
                .collect(),
        })
        .collect()
}
