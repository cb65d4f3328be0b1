// src/db/finance_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{appointment::Appointment, finance::FinancialEntry},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<FinancialEntry>, AppError> {
        let entries = sqlx::query_as::<_, FinancialEntry>(
            r#"
            SELECT id, client_name, procedure_description, amount, status, created_at
            FROM financial_entries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Lança a receita de um atendimento concluído. Idempotente por agendamento:
    /// devolve `None` se o lançamento já existia.
    pub async fn create_for_appointment<'e, E>(
        &self,
        executor: E,
        appointment: &Appointment,
    ) -> Result<Option<FinancialEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, FinancialEntry>(
            r#"
            INSERT INTO financial_entries (appointment_id, client_name, procedure_description, amount)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (appointment_id) DO NOTHING
            RETURNING id, client_name, procedure_description, amount, status, created_at
            "#,
        )
        .bind(appointment.id)
        .bind(&appointment.client_name)
        .bind(&appointment.procedure_name)
        .bind(appointment.procedure_price)
        .fetch_optional(executor)
        .await?;
        Ok(entry)
    }
}
