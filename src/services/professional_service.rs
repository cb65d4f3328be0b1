// src/services/professional_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProcedureRepository, ProfessionalRepository},
    models::professional::{NewProfessional, Professional, ProfessionalDetail, ProfessionalPatch},
};

#[derive(Clone)]
pub struct ProfessionalService {
    repo: ProfessionalRepository,
    procedure_repo: ProcedureRepository,
    pool: PgPool,
}

impl ProfessionalService {
    pub fn new(repo: ProfessionalRepository, procedure_repo: ProcedureRepository, pool: PgPool) -> Self {
        Self { repo, procedure_repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<Professional>, AppError> {
        self.repo.list().await
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<ProfessionalDetail, AppError> {
        let professional = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Profissional"))?;
        let procedures = self.procedure_repo.list(Some(id)).await?;
        Ok(ProfessionalDetail { professional, procedures })
    }

    pub async fn create(&self, payload: &NewProfessional) -> Result<Professional, AppError> {
        let professional = self.repo.create(&self.pool, payload).await?;
        tracing::info!("Profissional {} cadastrado ({})", professional.name, professional.id);
        Ok(professional)
    }

    pub async fn update(&self, id: Uuid, patch: &ProfessionalPatch) -> Result<ProfessionalDetail, AppError> {
        let mut detail = self.get_detail(id).await?;
        detail.apply_patch(patch);
        detail.professional = self.repo.update(&self.pool, &detail.professional).await?;
        Ok(detail)
    }

    /// Recusa a remoção enquanto houver procedimentos ou agendamentos apontando
    /// para o profissional. Os horários vão junto (cascade).
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if self.repo.find_by_id(&mut *tx, id).await?.is_none() {
            return Err(AppError::NotFound("Profissional"));
        }

        let (procedures, appointments) = self.repo.count_references(&mut *tx, id).await?;
        if procedures > 0 || appointments > 0 {
            tracing::warn!(
                "Remoção do profissional {} recusada: {} procedimento(s), {} agendamento(s)",
                id,
                procedures,
                appointments
            );
            return Err(AppError::ProfessionalInUse);
        }

        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;
        tracing::info!("Profissional {} removido", id);
        Ok(())
    }
}
