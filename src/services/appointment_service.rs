// src/services/appointment_service.rs

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        AppointmentRepository, ProcedureRepository, ProfessionalRepository, TimeSlotRepository,
        appointment_repo::AppointmentInsert,
    },
    domain::{
        lifecycle::{StatusMachine, TransitionError},
        views::AppointmentFilter,
    },
    models::{
        appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment},
        procedure::Procedure,
        professional::Professional,
        time_slot::TimeSlot,
    },
    services::finance_service::FinanceService,
};

#[derive(Clone)]
pub struct AppointmentService {
    repo: AppointmentRepository,
    slot_repo: TimeSlotRepository,
    procedure_repo: ProcedureRepository,
    professional_repo: ProfessionalRepository,
    finance_service: FinanceService,
    pool: PgPool,
}

impl AppointmentService {
    pub fn new(
        repo: AppointmentRepository,
        slot_repo: TimeSlotRepository,
        procedure_repo: ProcedureRepository,
        professional_repo: ProfessionalRepository,
        finance_service: FinanceService,
        pool: PgPool,
    ) -> Self {
        Self { repo, slot_repo, procedure_repo, professional_repo, finance_service, pool }
    }

    pub async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppError> {
        let appointments = self.repo.list().await?;
        Ok(filter.apply(&appointments))
    }

    pub async fn get(&self, id: Uuid) -> Result<Appointment, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Agendamento"))
    }

    pub async fn create(&self, payload: &NewAppointment) -> Result<Appointment, AppError> {
        let status = payload.status.unwrap_or_default();
        if status.is_terminal() {
            return Err(TransitionError::NotAllowed {
                from: AppointmentStatus::default().label(),
                to: status.label(),
            }
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let (procedure, professional) = self
            .resolve_catalog(&mut tx, payload.procedure_id, payload.professional_id)
            .await?;

        let mut row = AppointmentInsert {
            client_name: payload.client_name.trim().to_string(),
            client_phone: payload.client_phone.trim().to_string(),
            client_email: payload.client_email.clone().filter(|e| !e.trim().is_empty()),
            date: payload.date,
            time_slot_id: None,
            start_time: payload.start_time,
            end_time: payload.end_time,
            procedure_id: procedure.id,
            procedure_name: procedure.name,
            procedure_price: procedure.price,
            professional_id: professional.id,
            professional_name: professional.name,
            status,
        };

        if let Some(slot_id) = payload.time_slot_id {
            let slot = self.claim_slot(&mut tx, slot_id, row.professional_id).await?;
            row.time_slot_id = Some(slot.id);
            row.date = slot.date;
            row.start_time = Some(slot.start_time);
            row.end_time = Some(slot.end_time);
        }

        let appointment = self.repo.create(&mut *tx, &row).await?;
        tx.commit().await?;

        tracing::info!(
            "📅 Agendamento {} criado: {} com {} em {}",
            appointment.id,
            appointment.client_name,
            appointment.professional_name,
            appointment.date
        );
        Ok(appointment)
    }

    /// Edição parcial. Troca de status passa pela máquina de estados; cancelar
    /// ou marcar falta devolve o horário; concluir gera o lançamento financeiro.
    ///
    /// Um agendamento com horário que muda de profissional, dia ou hora perde o
    /// vínculo (o horário volta para a agenda), a menos que o patch traga um
    /// `timeSlotId` novo, que é reservado na mesma transação.
    pub async fn update(&self, id: Uuid, patch: &AppointmentPatch) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut appointment = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Agendamento"))?;
        let previous = appointment.status;

        let target = patch.status.filter(|to| *to != previous);
        if let Some(to) = target {
            previous.check_transition(to)?;
        }

        let catalog_changed = patch.procedure_id.is_some_and(|p| p != appointment.procedure_id)
            || patch.professional_id.is_some_and(|p| p != appointment.professional_id);

        let before = appointment.clone();
        appointment.apply_patch(patch);

        if catalog_changed {
            let (procedure, professional) = self
                .resolve_catalog(&mut tx, appointment.procedure_id, appointment.professional_id)
                .await?;
            appointment.procedure_name = procedure.name;
            appointment.procedure_price = procedure.price;
            appointment.professional_name = professional.name;
        }

        self.relink_slot(&mut tx, &before, &mut appointment, patch.time_slot_id)
            .await?;

        if let (Some(to), Some(slot_id)) = (target, appointment.time_slot_id) {
            if to.releases_slot() {
                self.slot_repo.release(&mut *tx, slot_id).await?;
                tracing::info!("Horário {} liberado ({})", slot_id, to);
            }
        }

        let updated = self.repo.update(&mut *tx, &appointment).await?;

        if target == Some(AppointmentStatus::Concluido) {
            self.finance_service
                .record_completed_appointment(&mut *tx, &updated)
                .await?;
        }

        tx.commit().await?;

        if let Some(to) = target {
            tracing::info!("Agendamento {}: '{}' -> '{}'", id, previous, to);
        }
        Ok(updated)
    }

    /// Remove de vez. Um agendamento ainda em aberto devolve o horário à agenda.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let deleted = self
            .repo
            .delete(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Agendamento"))?;

        if let Some(slot_id) = deleted.time_slot_id {
            if !deleted.status.is_terminal() {
                self.slot_repo.release(&mut *tx, slot_id).await?;
            }
        }
        tx.commit().await?;
        tracing::info!("Agendamento {} removido", id);
        Ok(())
    }

    /// Reserva o horário para o profissional; ocupado ou de outro profissional → 409.
    async fn claim_slot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slot_id: Uuid,
        professional_id: Uuid,
    ) -> Result<TimeSlot, AppError> {
        let Some(slot) = self.slot_repo.claim(&mut **tx, slot_id).await? else {
            return Err(match self.slot_repo.find_by_id(&mut **tx, slot_id).await? {
                Some(_) => AppError::SlotUnavailable,
                None => AppError::NotFound("Horário"),
            });
        };
        if slot.professional_id != professional_id {
            return Err(AppError::SlotUnavailable);
        }
        Ok(slot)
    }

    async fn relink_slot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        before: &Appointment,
        appointment: &mut Appointment,
        requested: Option<Uuid>,
    ) -> Result<(), AppError> {
        let held = before.time_slot_id;
        // o horário antigo só está ocupado enquanto o status não o liberou
        let holds_old = held.is_some() && !before.status.releases_slot();

        if let Some(slot_id) = requested.filter(|id| Some(*id) != held) {
            if before.status.is_terminal() {
                return Err(TransitionError::Terminal(before.status.label()).into());
            }
            let slot = self.claim_slot(tx, slot_id, appointment.professional_id).await?;
            if let (Some(old), true) = (held, holds_old) {
                self.slot_repo.release(&mut **tx, old).await?;
            }
            appointment.time_slot_id = Some(slot.id);
            appointment.date = slot.date;
            appointment.start_time = Some(slot.start_time);
            appointment.end_time = Some(slot.end_time);
            tracing::info!("Agendamento {}: horário trocado para {}", appointment.id, slot.id);
            return Ok(());
        }

        if let Some(old) = held {
            if appointment.schedule_differs(before) {
                if holds_old {
                    self.slot_repo.release(&mut **tx, old).await?;
                }
                appointment.time_slot_id = None;
                tracing::info!("Agendamento {}: vínculo com o horário {} desfeito", appointment.id, old);
            }
        }
        Ok(())
    }

    async fn resolve_catalog(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        procedure_id: Uuid,
        professional_id: Uuid,
    ) -> Result<(Procedure, Professional), AppError> {
        let procedure = self
            .procedure_repo
            .find_by_id(&mut **tx, procedure_id)
            .await?
            .ok_or(AppError::NotFound("Procedimento"))?;
        if procedure.professional_id != professional_id {
            return Err(AppError::ProcedureMismatch);
        }
        let professional = self
            .professional_repo
            .find_by_id(&mut **tx, professional_id)
            .await?
            .ok_or(AppError::NotFound("Profissional"))?;
        Ok((procedure, professional))
    }
}
