// src/client/resource.rs
//
// Cada recurso da API descrito uma única vez: tipos e caminhos. O cliente
// HTTP e os stores são genéricos sobre estas definições.

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    domain::{
        ledger::{LedgerQuery, LedgerView},
        views::{AppointmentFilter, SlotFilter},
    },
    models::{
        appointment::{Appointment, AppointmentPatch, NewAppointment, UpdateAppointmentPayload},
        finance::FinancialEntry,
        procedure::{NewProcedure, Procedure, ProcedurePatch, ProcedureQuery},
        product::{NewProduct, Product, ProductPatch},
        professional::{NewProfessional, Professional, ProfessionalPatch},
        time_slot::{NewTimeSlot, TimeSlot, TimeSlotPatch},
    },
};

/// Registro com identidade estável.
pub trait Identified {
    fn id(&self) -> Uuid;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

identified!(Appointment, TimeSlot, Professional, Procedure, Product, FinancialEntry);

/// Recursos sem filtro na listagem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoQuery {}

pub trait Resource: Send + Sync + 'static {
    type Item: Identified + Clone + DeserializeOwned + Send + Sync + 'static;
    type Query: Serialize + Default + Send + Sync;
    /// Corpo de `data` na listagem.
    type Listing: DeserializeOwned + Send;

    /// Prefixo da rota, sem barras (`"produto"`).
    const BASE: &'static str;

    fn into_items(listing: Self::Listing) -> Vec<Self::Item>;

    fn list_path() -> String {
        format!("/{}/getall", Self::BASE)
    }
}

/// Recursos com leitura individual (`GET /{base}/{id}`).
pub trait DetailResource: Resource {
    fn detail_path(id: Uuid) -> String {
        format!("/{}/{}", Self::BASE, id)
    }
}

pub trait WritableResource: Resource {
    type Create: Serialize + Send + Sync;
    type Patch: Serialize + Clone + Send + Sync;

    fn create_path() -> String {
        format!("/{}/create", Self::BASE)
    }

    fn update_path(id: Uuid) -> String {
        format!("/{}/update/{}", Self::BASE, id)
    }

    fn update_body(_id: Uuid, patch: &Self::Patch) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(patch)
    }

    fn delete_path(id: Uuid) -> String {
        format!("/{}/delete/{}", Self::BASE, id)
    }
}

// ---
// Recursos
// ---

pub struct Appointments;

impl Resource for Appointments {
    type Item = Appointment;
    type Query = AppointmentFilter;
    type Listing = Vec<Appointment>;
    const BASE: &'static str = "appointment";

    fn into_items(listing: Self::Listing) -> Vec<Self::Item> {
        listing
    }

    fn list_path() -> String {
        "/appointment/all".to_string()
    }
}

impl DetailResource for Appointments {}

impl WritableResource for Appointments {
    type Create = NewAppointment;
    type Patch = AppointmentPatch;

    // O id vai no corpo, não na rota
    fn update_path(_id: Uuid) -> String {
        "/appointment/update".to_string()
    }

    fn update_body(id: Uuid, patch: &Self::Patch) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(UpdateAppointmentPayload { id, patch: patch.clone() })
    }
}

pub struct TimeSlots;

impl Resource for TimeSlots {
    type Item = TimeSlot;
    type Query = SlotFilter;
    type Listing = Vec<TimeSlot>;
    const BASE: &'static str = "horario";

    fn into_items(listing: Self::Listing) -> Vec<Self::Item> {
        listing
    }
}

impl WritableResource for TimeSlots {
    type Create = NewTimeSlot;
    type Patch = TimeSlotPatch;

    // `/horario/create` recebe o lote
    fn create_path() -> String {
        "/horario/create-individual".to_string()
    }
}

pub struct Professionals;

impl Resource for Professionals {
    type Item = Professional;
    type Query = NoQuery;
    type Listing = Vec<Professional>;
    const BASE: &'static str = "profissional";

    fn into_items(listing: Self::Listing) -> Vec<Self::Item> {
        listing
    }
}

impl DetailResource for Professionals {}

impl WritableResource for Professionals {
    type Create = NewProfessional;
    type Patch = ProfessionalPatch;
}

pub struct Procedures;

impl Resource for Procedures {
    type Item = Procedure;
    type Query = ProcedureQuery;
    type Listing = Vec<Procedure>;
    const BASE: &'static str = "procedimento";

    fn into_items(listing: Self::Listing) -> Vec<Self::Item> {
        listing
    }
}

impl WritableResource for Procedures {
    type Create = NewProcedure;
    type Patch = ProcedurePatch;
}

pub struct Products;

impl Resource for Products {
    type Item = Product;
    type Query = NoQuery;
    type Listing = Vec<Product>;
    const BASE: &'static str = "produto";

    fn into_items(listing: Self::Listing) -> Vec<Self::Item> {
        listing
    }
}

impl WritableResource for Products {
    type Create = NewProduct;
    type Patch = ProductPatch;
}

/// Somente leitura: os lançamentos nascem dos atendimentos concluídos.
pub struct FinancialEntries;

impl Resource for FinancialEntries {
    type Item = FinancialEntry;
    type Query = LedgerQuery;
    type Listing = LedgerView;
    const BASE: &'static str = "financeiro";

    fn into_items(listing: Self::Listing) -> Vec<Self::Item> {
        listing.entries
    }
}
