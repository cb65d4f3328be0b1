// tests/common/mod.rs
//
// Dublê em memória da API para exercitar stores e confirmações sem rede.

#![allow(dead_code)]

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Notify, oneshot};
use uuid::Uuid;

use barbearia::{
    client::{
        BatchCreateApi, ClientError, Identified, ResourceApi, ResourceWriteApi, WritableResource,
        resource::{Appointments, Products, TimeSlots},
    },
    models::{
        appointment::{Appointment, AppointmentStatus, NewAppointment},
        product::{NewProduct, Product, ProductStatus},
        time_slot::{NewTimeSlot, NewTimeSlotBatch, TimeSlot},
    },
};

/// Como o dublê materializa criações e patches de cada recurso.
pub trait FakeResource: WritableResource {
    fn build(payload: &Self::Create) -> Self::Item;
    fn patch(item: &mut Self::Item, patch: &Self::Patch);
}

impl FakeResource for Appointments {
    fn build(p: &NewAppointment) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            client_name: p.client_name.clone(),
            client_phone: p.client_phone.clone(),
            client_email: p.client_email.clone(),
            date: p.date,
            time_slot_id: p.time_slot_id,
            start_time: p.start_time,
            end_time: p.end_time,
            procedure_id: p.procedure_id,
            procedure_name: "Corte".into(),
            procedure_price: Decimal::new(4000, 2),
            professional_id: p.professional_id,
            professional_name: "Rafael".into(),
            status: p.status.unwrap_or(AppointmentStatus::Pendente),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn patch(item: &mut Appointment, patch: &Self::Patch) {
        item.apply_patch(patch);
    }
}

impl FakeResource for Products {
    fn build(p: &NewProduct) -> Product {
        let status = p.status.unwrap_or(ProductStatus::Disponivel);
        Product {
            id: Uuid::new_v4(),
            name: p.name.clone(),
            category: p.category.clone(),
            price: p.price,
            stock: p.stock,
            description: p.description.clone(),
            status,
            pending_user: if status == ProductStatus::Pendente { p.pending_user.clone() } else { None },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn patch(item: &mut Product, patch: &Self::Patch) {
        item.apply_patch(patch);
    }
}

impl FakeResource for TimeSlots {
    fn build(p: &NewTimeSlot) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            professional_id: p.professional_id,
            professional_name: "Rafael".into(),
            date: p.date,
            start_time: p.start_time,
            end_time: p.end_time,
            available: true,
            created_at: Utc::now(),
        }
    }

    fn patch(item: &mut TimeSlot, patch: &Self::Patch) {
        item.apply_patch(patch);
    }
}

pub struct FakeApi<R: WritableResource> {
    items: Mutex<Vec<R::Item>>,
    calls: AtomicUsize,
    fail_next: AtomicBool,
    hold_next_list: Mutex<Option<oneshot::Receiver<()>>>,
    pub list_started: Notify,
}

impl<R: FakeResource> FakeApi<R> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<R::Item>) -> Self {
        Self {
            items: Mutex::new(items),
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            hold_next_list: Mutex::new(None),
            list_started: Notify::new(),
        }
    }

    /// Quantas chamadas chegaram à "rede".
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Insere direto no "servidor", sem passar pelo store.
    pub fn seed(&self, item: R::Item) {
        self.items.lock().unwrap().push(item);
    }

    pub fn server_items(&self) -> Vec<R::Item> {
        self.items.lock().unwrap().clone()
    }

    /// A próxima listagem congela o resultado e só responde quando o sender for usado.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold_next_list.lock().unwrap() = Some(rx);
        tx
    }

    fn enter(&self) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ClientError::Api { status: 500, message: "Erro interno do servidor.".into() });
        }
        Ok(())
    }
}

#[async_trait]
impl<R: FakeResource> ResourceApi<R> for FakeApi<R> {
    async fn list(&self, _query: &R::Query) -> Result<Vec<R::Item>, ClientError> {
        self.enter()?;
        let snapshot = self.server_items();
        let hold = self.hold_next_list.lock().unwrap().take();
        self.list_started.notify_one();
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl<R: FakeResource> ResourceWriteApi<R> for FakeApi<R> {
    async fn create(&self, payload: &R::Create) -> Result<R::Item, ClientError> {
        self.enter()?;
        let item = R::build(payload);
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: &R::Patch) -> Result<R::Item, ClientError> {
        self.enter()?;
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or_else(|| ClientError::Api { status: 404, message: "Não encontrado.".into() })?;
        R::patch(item, patch);
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.enter()?;
        self.items.lock().unwrap().retain(|i| i.id() != id);
        Ok(())
    }
}

#[async_trait]
impl BatchCreateApi for FakeApi<TimeSlots> {
    async fn create_batch(&self, batch: &NewTimeSlotBatch) -> Result<Vec<TimeSlot>, ClientError> {
        self.enter()?;
        let created: Vec<TimeSlot> = batch.slots.iter().map(TimeSlots::build).collect();
        self.items.lock().unwrap().extend(created.iter().cloned());
        Ok(created)
    }
}

// ---
// Fixtures
// ---

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn new_appointment(client: &str, date: NaiveDate) -> NewAppointment {
    NewAppointment {
        client_name: client.into(),
        client_phone: "11988887777".into(),
        client_email: None,
        date,
        time_slot_id: None,
        start_time: Some(hm(9, 0)),
        end_time: Some(hm(9, 30)),
        procedure_id: Uuid::new_v4(),
        professional_id: Uuid::new_v4(),
        status: None,
    }
}

pub fn appointment(client: &str, date: NaiveDate, status: AppointmentStatus) -> Appointment {
    let mut appointment = Appointments::build(&new_appointment(client, date));
    appointment.status = status;
    appointment
}

pub fn product(name: &str, status: ProductStatus) -> Product {
    Products::build(&NewProduct {
        name: name.into(),
        category: "Cabelo".into(),
        price: Decimal::new(2990, 2),
        stock: 5,
        description: None,
        status: Some(status),
        pending_user: (status == ProductStatus::Pendente).then(|| "Carlos".to_string()),
    })
}

pub fn new_slot(professional_id: Uuid, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> NewTimeSlot {
    NewTimeSlot { professional_id, date, start_time: start, end_time: end }
}
