// src/services/schedule_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TimeSlotRepository,
    domain::views::SlotFilter,
    models::time_slot::{NewTimeSlot, TimeSlot, TimeSlotPatch},
};

#[derive(Clone)]
pub struct ScheduleService {
    repo: TimeSlotRepository,
    pool: PgPool,
}

impl ScheduleService {
    pub fn new(repo: TimeSlotRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, filter: &SlotFilter) -> Result<Vec<TimeSlot>, AppError> {
        let slots = self.repo.list().await?;
        Ok(filter.apply(&slots))
    }

    pub async fn open_slots_for(&self, professional_id: Uuid) -> Result<Vec<TimeSlot>, AppError> {
        self.repo.list_open_by_professional(professional_id).await
    }

    pub async fn available(&self, professional_id: Uuid, date: NaiveDate) -> Result<Vec<TimeSlot>, AppError> {
        self.repo.list_available(professional_id, date).await
    }

    /// Sem checagem prévia de duplicidade: a constraint única decide.
    pub async fn create_one(&self, payload: &NewTimeSlot) -> Result<TimeSlot, AppError> {
        let slot = self.repo.create(&self.pool, payload).await?;
        tracing::info!("Horário {} {} criado para {}", slot.date, slot.start_time, slot.professional_name);
        Ok(slot)
    }

    /// Geração em lote: tudo ou nada.
    pub async fn create_batch(&self, payloads: &[NewTimeSlot]) -> Result<Vec<TimeSlot>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(payloads.len());
        for payload in payloads {
            created.push(self.repo.create(&mut *tx, payload).await?);
        }
        tx.commit().await?;
        tracing::info!("{} horário(s) gerado(s)", created.len());
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, patch: &TimeSlotPatch) -> Result<TimeSlot, AppError> {
        self.repo
            .set_availability(&self.pool, id, patch.available)
            .await?
            .ok_or(AppError::NotFound("Horário"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(&self.pool, id).await?;
        tracing::info!("Horário {} removido", id);
        Ok(())
    }
}
