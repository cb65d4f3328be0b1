// src/services/finance_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::FinanceRepository,
    domain::ledger::{LedgerQuery, LedgerView},
    models::{appointment::Appointment, finance::FinancialEntry},
};

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository) -> Self {
        Self { repo }
    }

    pub async fn ledger(&self, query: &LedgerQuery) -> Result<LedgerView, AppError> {
        let entries = self.repo.list().await?;
        Ok(LedgerView::build(&entries, query))
    }

    /// Cria o lançamento pendente de um atendimento concluído, dentro da
    /// transação de quem mudou o status.
    pub async fn record_completed_appointment<'e, E>(
        &self,
        executor: E,
        appointment: &Appointment,
    ) -> Result<Option<FinancialEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = self.repo.create_for_appointment(executor, appointment).await?;
        if let Some(entry) = &entry {
            tracing::info!(
                "💰 Lançamento {} criado para o agendamento {} ({})",
                entry.id,
                appointment.id,
                entry.amount
            );
        }
        Ok(entry)
    }
}
