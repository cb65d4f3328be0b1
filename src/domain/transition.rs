// src/domain/transition.rs
//
// Troca de status em duas fases: `request` valida e devolve um token de
// confirmação; `take` consome o token para que a mutação seja enviada.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::lifecycle::{StatusMachine, TransitionError, check_product_transition},
    models::{
        appointment::{Appointment, AppointmentStatus},
        product::{Product, ProductStatus},
    },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum TransitionSubject {
    Appointment {
        id: Uuid,
        client_name: String,
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    Product {
        id: Uuid,
        name: String,
        from: ProductStatus,
        to: ProductStatus,
        pending_user: Option<String>,
    },
}

impl TransitionSubject {
    /// ID do agendamento ou produto alvo.
    pub fn target_id(&self) -> Uuid {
        match self {
            TransitionSubject::Appointment { id, .. } | TransitionSubject::Product { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransition {
    pub token: Uuid,
    pub subject: TransitionSubject,
    pub requires_confirmation: bool,
    /// Texto do modal de confirmação.
    pub prompt: String,
}

#[derive(Debug, Default)]
pub struct TransitionLedger {
    pending: HashMap<Uuid, PendingTransition>,
}

impl TransitionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_appointment(
        &mut self,
        appointment: &Appointment,
        to: AppointmentStatus,
    ) -> Result<PendingTransition, TransitionError> {
        let from = appointment.status;
        from.check_transition(to)?;

        let prompt = format!(
            "Deseja alterar o status do agendamento de {} para '{}'?",
            appointment.client_name,
            to.label()
        );
        let subject = TransitionSubject::Appointment {
            id: appointment.id,
            client_name: appointment.client_name.clone(),
            from,
            to,
        };
        Ok(self.register(subject, from.requires_confirmation(to), prompt))
    }

    pub fn request_product(
        &mut self,
        product: &Product,
        to: ProductStatus,
        pending_user: Option<&str>,
    ) -> Result<PendingTransition, TransitionError> {
        let from = product.status;
        check_product_transition(from, to, pending_user)?;

        let pending_user = match to {
            ProductStatus::Pendente => pending_user.map(|u| u.trim().to_string()),
            _ => None,
        };
        let prompt = match &pending_user {
            Some(user) => format!(
                "Deseja marcar o produto '{}' como '{}' (responsável: {})?",
                product.name,
                to.label(),
                user
            ),
            None => format!("Deseja marcar o produto '{}' como '{}'?", product.name, to.label()),
        };
        let subject = TransitionSubject::Product {
            id: product.id,
            name: product.name.clone(),
            from,
            to,
            pending_user,
        };
        Ok(self.register(subject, from.requires_confirmation(to), prompt))
    }

    /// Consome o token. Um token só pode ser usado uma vez.
    pub fn take(&mut self, token: Uuid) -> Result<PendingTransition, TransitionError> {
        self.pending.remove(&token).ok_or(TransitionError::UnknownToken(token))
    }

    pub fn peek(&self, token: Uuid) -> Option<&PendingTransition> {
        self.pending.get(&token)
    }

    /// Devolve um token consumido cujo envio falhou, salvo se um pedido mais
    /// novo para o mesmo alvo já o substituiu.
    pub fn restore(&mut self, pending: PendingTransition) -> bool {
        let target = pending.subject.target_id();
        if self.pending.values().any(|p| p.subject.target_id() == target) {
            return false;
        }
        self.pending.insert(pending.token, pending);
        true
    }

    /// Usuário desistiu no modal; nada é enviado.
    pub fn cancel(&mut self, token: Uuid) -> bool {
        self.pending.remove(&token).is_some()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn register(
        &mut self,
        subject: TransitionSubject,
        requires_confirmation: bool,
        prompt: String,
    ) -> PendingTransition {
        // um pedido novo substitui o anterior para o mesmo alvo
        let target = subject.target_id();
        self.pending.retain(|_, p| p.subject.target_id() != target);

        let pending = PendingTransition {
            token: Uuid::new_v4(),
            subject,
            requires_confirmation,
            prompt,
        };
        self.pending.insert(pending.token, pending.clone());
        pending
    }
}
