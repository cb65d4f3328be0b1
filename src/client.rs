// src/client.rs
//
// Cliente tipado do painel: consome a própria API e mantém o estado local
// de cada recurso (lista, carregamento e último erro).

pub mod api;
pub mod error;
pub mod guards;
pub mod resource;
pub mod session;
pub mod store;
pub mod transition;

pub use api::{ApiClient, AuthClient, BatchCreateApi, ResourceApi, ResourceClient, ResourceWriteApi};
pub use error::ClientError;
pub use resource::{
    Appointments, FinancialEntries, Identified, NoQuery, Procedures, Products, Professionals,
    Resource, TimeSlots, WritableResource,
};
pub use session::Session;
pub use store::{
    AppointmentStore, FetchOutcome, FinanceStore, ProcedureStore, ProductStore, ProfessionalStore,
    ResourceStore, SlotStore,
};
pub use transition::TransitionDesk;
