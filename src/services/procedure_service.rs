// src/services/procedure_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProcedureRepository,
    models::procedure::{NewProcedure, Procedure, ProcedurePatch},
};

#[derive(Clone)]
pub struct ProcedureService {
    repo: ProcedureRepository,
    pool: PgPool,
}

impl ProcedureService {
    pub fn new(repo: ProcedureRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, professional_id: Option<Uuid>) -> Result<Vec<Procedure>, AppError> {
        self.repo.list(professional_id).await
    }

    pub async fn create(&self, payload: &NewProcedure) -> Result<Procedure, AppError> {
        let procedure = self.repo.create(&self.pool, payload).await?;
        tracing::info!("Procedimento {} cadastrado (R$ {})", procedure.name, procedure.price);
        Ok(procedure)
    }

    pub async fn update(&self, id: Uuid, patch: &ProcedurePatch) -> Result<Procedure, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut procedure = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Procedimento"))?;
        procedure.apply_patch(patch);
        let updated = self.repo.update(&mut *tx, &procedure).await?;
        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(&self.pool, id).await?;
        tracing::info!("Procedimento {} removido", id);
        Ok(())
    }
}
