// src/client/store.rs
//
// Estado local de um recurso no painel: lista, carregamento e último erro.
// Leituras que falham viram lista vazia + erro; escritas que falham deixam
// a lista como estava e devolvem o erro.

use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::{
    client::{
        api::{BatchCreateApi, ResourceApi, ResourceClient, ResourceWriteApi},
        error::ClientError,
        resource::{
            Appointments, FinancialEntries, Identified, Procedures, Products, Professionals,
            Resource, TimeSlots, WritableResource,
        },
    },
    domain::{
        ledger::{LedgerQuery, LedgerView},
        views::{AppointmentFilter, ProfessionalSchedule, group_slots},
    },
    models::{
        appointment::Appointment,
        time_slot::{NewTimeSlotBatch, TimeSlot},
    },
};

/// Resultado de um `fetch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(usize),
    Failed,
    /// Uma busca mais nova começou antes desta terminar; o resultado foi descartado.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

struct StoreState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

pub struct ResourceStore<R: Resource, A> {
    api: A,
    state: Mutex<StoreState<R::Item>>,
}

pub type AppointmentStore<A = ResourceClient<Appointments>> = ResourceStore<Appointments, A>;
pub type SlotStore<A = ResourceClient<TimeSlots>> = ResourceStore<TimeSlots, A>;
pub type ProfessionalStore<A = ResourceClient<Professionals>> = ResourceStore<Professionals, A>;
pub type ProcedureStore<A = ResourceClient<Procedures>> = ResourceStore<Procedures, A>;
pub type ProductStore<A = ResourceClient<Products>> = ResourceStore<Products, A>;
pub type FinanceStore<A = ResourceClient<FinancialEntries>> = ResourceStore<FinancialEntries, A>;

impl<R: Resource, A> ResourceStore<R, A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState { items: Vec::new(), loading: false, error: None, generation: 0 }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.lock().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn find(&self, id: Uuid) -> Option<R::Item> {
        self.lock().items.iter().find(|item| item.id() == id).cloned()
    }

    pub fn snapshot(&self) -> StoreSnapshot<R::Item> {
        let state = self.lock();
        StoreSnapshot { items: state.items.clone(), loading: state.loading, error: state.error.clone() }
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<R::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_failure(&self, action: &str, error: &ClientError) {
        tracing::warn!("Falha ao {} ({}): {}", action, R::BASE, error);
        self.lock().error = Some(error.to_string());
    }
}

impl<R, A> ResourceStore<R, A>
where
    R: Resource,
    A: ResourceApi<R>,
{
    /// Recarrega a lista. Só a busca mais recente aplica o resultado.
    pub async fn fetch(&self, query: &R::Query) -> FetchOutcome {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.loading = true;
            state.error = None;
            state.generation
        };

        let result = self.api.list(query).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!("Resposta antiga de {} descartada", R::BASE);
            return FetchOutcome::Superseded;
        }
        state.loading = false;
        match result {
            Ok(items) => {
                let count = items.len();
                state.items = items;
                FetchOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!("Falha ao carregar {}: {}", R::BASE, e);
                state.items.clear();
                state.error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }
}

impl<R, A> ResourceStore<R, A>
where
    R: WritableResource,
    A: ResourceWriteApi<R>,
{
    pub async fn add(&self, payload: &R::Create) -> Result<R::Item, ClientError> {
        match self.api.create(payload).await {
            Ok(item) => {
                let mut state = self.lock();
                state.items.push(item.clone());
                state.error = None;
                Ok(item)
            }
            Err(e) => {
                self.record_failure("criar", &e);
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: Uuid, patch: &R::Patch) -> Result<R::Item, ClientError> {
        match self.api.update(id, patch).await {
            Ok(item) => {
                let mut state = self.lock();
                if let Some(slot) = state.items.iter_mut().find(|existing| existing.id() == id) {
                    *slot = item.clone();
                }
                state.error = None;
                Ok(item)
            }
            Err(e) => {
                self.record_failure("atualizar", &e);
                Err(e)
            }
        }
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), ClientError> {
        match self.api.delete(id).await {
            Ok(()) => {
                let mut state = self.lock();
                state.items.retain(|item| item.id() != id);
                state.error = None;
                Ok(())
            }
            Err(e) => {
                self.record_failure("remover", &e);
                Err(e)
            }
        }
    }
}

// ---
// Específicos por recurso
// ---

impl<A: BatchCreateApi> ResourceStore<TimeSlots, A> {
    /// Gera vários horários de uma vez; se um falhar, nenhum é criado.
    pub async fn generate(&self, batch: &NewTimeSlotBatch) -> Result<Vec<TimeSlot>, ClientError> {
        if batch.slots.is_empty() {
            let e = ClientError::Validation("Adicione pelo menos um horário.".to_string());
            self.record_failure("gerar horários", &e);
            return Err(e);
        }
        match self.api.create_batch(batch).await {
            Ok(created) => {
                let mut state = self.lock();
                state.items.extend(created.iter().cloned());
                state.error = None;
                Ok(created)
            }
            Err(e) => {
                self.record_failure("gerar horários", &e);
                Err(e)
            }
        }
    }
}

impl<A> ResourceStore<TimeSlots, A> {
    /// Agenda agrupada por profissional e dia.
    pub fn grouped(&self) -> Vec<ProfessionalSchedule> {
        group_slots(&self.lock().items)
    }
}

impl<A> ResourceStore<Appointments, A> {
    pub fn filtered(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        filter.apply(&self.lock().items)
    }
}

impl<A> ResourceStore<FinancialEntries, A> {
    /// Refiltra localmente o que já foi carregado.
    pub fn view(&self, query: &LedgerQuery) -> LedgerView {
        LedgerView::build(&self.lock().items, query)
    }
}
