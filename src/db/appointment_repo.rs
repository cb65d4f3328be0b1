// src/db/appointment_repo.rs

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::appointment::{Appointment, AppointmentStatus},
};

/// Linha pronta para inserir, com os snapshots já resolvidos pelo serviço.
#[derive(Debug, Clone)]
pub struct AppointmentInsert {
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub date: NaiveDate,
    pub time_slot_id: Option<Uuid>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub procedure_id: Uuid,
    pub procedure_name: String,
    pub procedure_price: Decimal,
    pub professional_id: Uuid,
    pub professional_name: String,
    pub status: AppointmentStatus,
}

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Appointment>, AppError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments ORDER BY date DESC, start_time ASC NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Appointment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(appointment)
    }

    /// Mesmo que `find_by_id`, mas trava a linha até o fim da transação.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Appointment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(appointment)
    }

    pub async fn create<'e, E>(&self, executor: E, row: &AppointmentInsert) -> Result<Appointment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                client_name, client_phone, client_email, date,
                time_slot_id, start_time, end_time,
                procedure_id, procedure_name, procedure_price,
                professional_id, professional_name, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&row.client_name)
        .bind(&row.client_phone)
        .bind(&row.client_email)
        .bind(row.date)
        .bind(row.time_slot_id)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(row.procedure_id)
        .bind(&row.procedure_name)
        .bind(row.procedure_price)
        .bind(row.professional_id)
        .bind(&row.professional_name)
        .bind(row.status)
        .fetch_one(executor)
        .await?;
        Ok(appointment)
    }

    /// Grava o estado completo; `updated_at` é sempre do servidor.
    pub async fn update<'e, E>(&self, executor: E, appointment: &Appointment) -> Result<Appointment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments SET
                client_name = $2, client_phone = $3, client_email = $4, date = $5,
                time_slot_id = $6, start_time = $7, end_time = $8,
                procedure_id = $9, procedure_name = $10, procedure_price = $11,
                professional_id = $12, professional_name = $13, status = $14,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(appointment.id)
        .bind(&appointment.client_name)
        .bind(&appointment.client_phone)
        .bind(&appointment.client_email)
        .bind(appointment.date)
        .bind(appointment.time_slot_id)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(appointment.procedure_id)
        .bind(&appointment.procedure_name)
        .bind(appointment.procedure_price)
        .bind(appointment.professional_id)
        .bind(&appointment.professional_name)
        .bind(appointment.status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Agendamento"))?;
        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Appointment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = sqlx::query_as::<_, Appointment>("DELETE FROM appointments WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(deleted)
    }
}
