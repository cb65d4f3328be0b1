// src/client/transition.rs
//
// Mesa de confirmação do painel: a troca de status é pedida, exibida no
// modal e só vai para a API quando o usuário confirma.

use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::{
    client::{
        api::ResourceWriteApi,
        error::ClientError,
        resource::{Appointments, Products},
        store::ResourceStore,
    },
    domain::{
        lifecycle::TransitionError,
        transition::{PendingTransition, TransitionLedger, TransitionSubject},
    },
    models::{
        appointment::{Appointment, AppointmentPatch, AppointmentStatus},
        product::{Product, ProductPatch, ProductStatus},
    },
};

#[derive(Debug, Default)]
pub struct TransitionDesk {
    ledger: Mutex<TransitionLedger>,
}

impl TransitionDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valida a troca sem tocar na rede.
    pub fn request_appointment(
        &self,
        appointment: &Appointment,
        to: AppointmentStatus,
    ) -> Result<PendingTransition, TransitionError> {
        self.lock().request_appointment(appointment, to)
    }

    pub fn request_product(
        &self,
        product: &Product,
        to: ProductStatus,
        pending_user: Option<&str>,
    ) -> Result<PendingTransition, TransitionError> {
        self.lock().request_product(product, to, pending_user)
    }

    pub fn cancel(&self, token: Uuid) -> bool {
        self.lock().cancel(token)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Confirma uma troca de agendamento e envia só o novo status. Se o envio
    /// falhar o token volta para a mesa e a confirmação pode ser repetida.
    pub async fn commit_appointment<A>(
        &self,
        token: Uuid,
        store: &ResourceStore<Appointments, A>,
    ) -> Result<Appointment, ClientError>
    where
        A: ResourceWriteApi<Appointments>,
    {
        let pending = self.lock().take(token)?;
        let target = match &pending.subject {
            TransitionSubject::Appointment { id, to, .. } => Some((*id, *to)),
            TransitionSubject::Product { .. } => None,
        };
        let Some((id, to)) = target else {
            self.lock().restore(pending);
            return Err(TransitionError::UnknownToken(token).into());
        };

        let result = store.update(id, &AppointmentPatch::status_only(to)).await;
        if result.is_err() {
            self.lock().restore(pending);
        }
        result
    }

    pub async fn commit_product<A>(
        &self,
        token: Uuid,
        store: &ResourceStore<Products, A>,
    ) -> Result<Product, ClientError>
    where
        A: ResourceWriteApi<Products>,
    {
        let pending = self.lock().take(token)?;
        let target = match &pending.subject {
            TransitionSubject::Product { id, to, pending_user, .. } => {
                Some((*id, ProductPatch::status_change(*to, pending_user.clone())))
            }
            TransitionSubject::Appointment { .. } => None,
        };
        let Some((id, patch)) = target else {
            self.lock().restore(pending);
            return Err(TransitionError::UnknownToken(token).into());
        };

        let result = store.update(id, &patch).await;
        if result.is_err() {
            self.lock().restore(pending);
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, TransitionLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
