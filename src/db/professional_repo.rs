// src/db/professional_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::is_foreign_key_violation,
    models::professional::{NewProfessional, Professional},
};

#[derive(Clone)]
pub struct ProfessionalRepository {
    pool: PgPool,
}

impl ProfessionalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Professional>, AppError> {
        let professionals =
            sqlx::query_as::<_, Professional>("SELECT * FROM professionals ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(professionals)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Professional>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let professional =
            sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(professional)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &NewProfessional) -> Result<Professional, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let professional = sqlx::query_as::<_, Professional>(
            r#"
            INSERT INTO professionals (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.email.trim())
        .bind(payload.phone.trim())
        .fetch_one(executor)
        .await?;
        Ok(professional)
    }

    pub async fn update<'e, E>(&self, executor: E, professional: &Professional) -> Result<Professional, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Professional>(
            r#"
            UPDATE professionals
            SET name = $2, email = $3, phone = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(professional.id)
        .bind(&professional.name)
        .bind(&professional.email)
        .bind(&professional.phone)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Profissional"))?;
        Ok(updated)
    }

    /// Quantos procedimentos e agendamentos ainda apontam para o profissional.
    pub async fn count_references<'e, E>(&self, executor: E, id: Uuid) -> Result<(i64, i64), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM procedures WHERE professional_id = $1),
                (SELECT COUNT(*) FROM appointments WHERE professional_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(counts)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM professionals WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::ProfessionalInUse;
                }
                e.into()
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Profissional"));
        }
        Ok(())
    }
}
