// src/domain/ledger.rs
//
// Visão do financeiro: filtro por status, busca livre, ordenação e totais.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    domain::views::StatusFilter,
    models::finance::{FinancialEntry, FinancialStatus},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerSort {
    #[default]
    Recentes,
    Antigos,
    MaiorValor,
    MenorValor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LedgerQuery {
    /// `todos`, `pago` ou `pendente`
    #[serde(default)]
    #[param(value_type = Option<String>, example = "pendente")]
    pub status: StatusFilter<FinancialStatus>,

    /// Busca no nome do cliente e na descrição do procedimento
    #[serde(default, rename = "busca", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(default, rename = "ordem")]
    #[param(value_type = Option<LedgerSort>)]
    pub sort: LedgerSort,
}

impl LedgerQuery {
    pub fn matches(&self, entry: &FinancialEntry) -> bool {
        if !self.status.matches(&entry.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                entry.client_name.to_lowercase().contains(&term)
                    || entry.procedure_description.to_lowercase().contains(&term)
            }
        }
    }

    pub fn apply(&self, entries: &[FinancialEntry]) -> Vec<FinancialEntry> {
        let mut result: Vec<FinancialEntry> =
            entries.iter().filter(|e| self.matches(e)).cloned().collect();
        match self.sort {
            LedgerSort::Recentes => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            LedgerSort::Antigos => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            LedgerSort::MaiorValor => result.sort_by(|a, b| b.amount.cmp(&a.amount)),
            LedgerSort::MenorValor => result.sort_by(|a, b| a.amount.cmp(&b.amount)),
        }
        result
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_paid: Decimal,
    pub total_pending: Decimal,
    pub count: usize,
}

impl LedgerSummary {
    pub fn of(entries: &[FinancialEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            match entry.status {
                FinancialStatus::Pago => acc.total_paid += entry.amount,
                FinancialStatus::Pendente => acc.total_pending += entry.amount,
            }
            acc.count += 1;
            acc
        })
    }
}

/// Resposta do `GET /financeiro/getall`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerView {
    pub entries: Vec<FinancialEntry>,
    pub summary: LedgerSummary,
}

impl LedgerView {
    pub fn build(entries: &[FinancialEntry], query: &LedgerQuery) -> Self {
        let entries = query.apply(entries);
        let summary = LedgerSummary::of(&entries);
        Self { entries, summary }
    }
}
