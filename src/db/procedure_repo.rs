// src/db/procedure_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::is_foreign_key_violation,
    models::procedure::{NewProcedure, Procedure},
};

#[derive(Clone)]
pub struct ProcedureRepository {
    pool: PgPool,
}

impl ProcedureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista todos, ou só os de um profissional.
    pub async fn list(&self, professional_id: Option<Uuid>) -> Result<Vec<Procedure>, AppError> {
        let procedures = sqlx::query_as::<_, Procedure>(
            r#"
            SELECT * FROM procedures
            WHERE ($1::uuid IS NULL OR professional_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(professional_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(procedures)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Procedure>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let procedure = sqlx::query_as::<_, Procedure>("SELECT * FROM procedures WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(procedure)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &NewProcedure) -> Result<Procedure, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let procedure = sqlx::query_as::<_, Procedure>(
            r#"
            INSERT INTO procedures (name, price, professional_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.price)
        .bind(payload.professional_id)
        .fetch_one(executor)
        .await
        .map_err(map_professional_fk)?;
        Ok(procedure)
    }

    pub async fn update<'e, E>(&self, executor: E, procedure: &Procedure) -> Result<Procedure, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Procedure>(
            r#"
            UPDATE procedures
            SET name = $2, price = $3, professional_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(procedure.id)
        .bind(&procedure.name)
        .bind(procedure.price)
        .bind(procedure.professional_id)
        .fetch_optional(executor)
        .await
        .map_err(map_professional_fk)?
        .ok_or(AppError::NotFound("Procedimento"))?;
        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM procedures WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::ProcedureInUse;
                }
                e.into()
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Procedimento"));
        }
        Ok(())
    }
}

// Inserir/atualizar com um profissional inexistente
fn map_professional_fk(e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        return AppError::NotFound("Profissional");
    }
    e.into()
}
