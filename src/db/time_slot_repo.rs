// src/db/time_slot_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::is_foreign_key_violation,
    models::time_slot::{NewTimeSlot, TimeSlot},
};

// Todo horário sai daqui já com o nome do profissional
const SLOT_SELECT: &str = r#"
    SELECT ts.id, ts.professional_id, p.name AS professional_name,
           ts.date, ts.start_time, ts.end_time, ts.available, ts.created_at
    FROM time_slots ts
    JOIN professionals p ON p.id = ts.professional_id
"#;

// Mesmo formato, a partir de uma CTE `changed` (INSERT/UPDATE ... RETURNING *)
const CHANGED_SELECT: &str = r#"
    SELECT c.id, c.professional_id, p.name AS professional_name,
           c.date, c.start_time, c.end_time, c.available, c.created_at
    FROM changed c
    JOIN professionals p ON p.id = c.professional_id
"#;

const UNIQUE_START_CONSTRAINT: &str = "time_slots_professional_start_key";

#[derive(Clone)]
pub struct TimeSlotRepository {
    pool: PgPool,
}

impl TimeSlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<TimeSlot>, AppError> {
        let slots = sqlx::query_as::<_, TimeSlot>(&format!(
            "{SLOT_SELECT} ORDER BY ts.date ASC, ts.start_time ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    /// Horários livres de hoje em diante (agenda pública do profissional).
    pub async fn list_open_by_professional(&self, professional_id: Uuid) -> Result<Vec<TimeSlot>, AppError> {
        let slots = sqlx::query_as::<_, TimeSlot>(&format!(
            r#"{SLOT_SELECT}
            WHERE ts.professional_id = $1 AND ts.available AND ts.date >= CURRENT_DATE
            ORDER BY ts.date ASC, ts.start_time ASC"#
        ))
        .bind(professional_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    pub async fn list_available(&self, professional_id: Uuid, date: NaiveDate) -> Result<Vec<TimeSlot>, AppError> {
        let slots = sqlx::query_as::<_, TimeSlot>(&format!(
            r#"{SLOT_SELECT}
            WHERE ts.professional_id = $1 AND ts.date = $2 AND ts.available
            ORDER BY ts.start_time ASC"#
        ))
        .bind(professional_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(slots)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<TimeSlot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, TimeSlot>(&format!("{SLOT_SELECT} WHERE ts.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(slot)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &NewTimeSlot) -> Result<TimeSlot, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, TimeSlot>(&format!(
            r#"
            WITH changed AS (
                INSERT INTO time_slots (professional_id, date, start_time, end_time)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            {CHANGED_SELECT}
            "#
        ))
        .bind(payload.professional_id)
        .bind(payload.date)
        .bind(payload.start_time)
        .bind(payload.end_time)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() && db_err.constraint() == Some(UNIQUE_START_CONSTRAINT) {
                    return AppError::SlotAlreadyExists;
                }
            }
            if is_foreign_key_violation(&e) {
                return AppError::NotFound("Profissional");
            }
            e.into()
        })?;
        Ok(slot)
    }

    pub async fn set_availability<'e, E>(&self, executor: E, id: Uuid, available: bool) -> Result<Option<TimeSlot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, TimeSlot>(&format!(
            r#"
            WITH changed AS (
                UPDATE time_slots SET available = $2 WHERE id = $1 RETURNING *
            )
            {CHANGED_SELECT}
            "#
        ))
        .bind(id)
        .bind(available)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    /// Reserva o horário de forma atômica: só quem encontrar `available = true` leva.
    pub async fn claim<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<TimeSlot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slot = sqlx::query_as::<_, TimeSlot>(&format!(
            r#"
            WITH changed AS (
                UPDATE time_slots SET available = FALSE
                WHERE id = $1 AND available
                RETURNING *
            )
            {CHANGED_SELECT}
            "#
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(slot)
    }

    pub async fn release<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE time_slots SET available = TRUE WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM time_slots WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Horário"));
        }
        Ok(())
    }
}
