// tests/client_store.rs

mod common;

use std::sync::Arc;

use barbearia::{
    client::{
        FetchOutcome, NoQuery, ResourceStore, TransitionDesk,
        guards::product_status_options,
        resource::{Appointments, Products, TimeSlots},
    },
    domain::{
        lifecycle::{StatusMachine, TransitionError},
        views::{AppointmentFilter, SlotFilter, StatusFilter},
    },
    models::{
        appointment::AppointmentStatus,
        product::ProductStatus,
        time_slot::NewTimeSlotBatch,
    },
};
use common::{FakeApi, appointment, day, hm, new_appointment, new_slot, product};
use uuid::Uuid;

type Store<R> = ResourceStore<R, FakeApi<R>>;

#[tokio::test]
async fn terminal_appointment_never_reaches_the_network() {
    let desk = TransitionDesk::new();
    let store: Store<Appointments> = ResourceStore::new(FakeApi::new());

    for status in [AppointmentStatus::Concluido, AppointmentStatus::Cancelado, AppointmentStatus::NaoCompareceu] {
        let done = appointment("Marcos", day(2025, 3, 10), status);
        store.api().seed(done.clone());
        assert!(status.next_states().is_empty());

        let err = desk.request_appointment(&done, AppointmentStatus::Agendado).unwrap_err();
        assert_eq!(err, TransitionError::Terminal(status.label()));
    }

    assert_eq!(desk.pending_count(), 0);
    assert_eq!(store.api().calls(), 0);
}

#[tokio::test]
async fn confirmed_appointment_transition_sends_status_only() {
    let desk = TransitionDesk::new();
    let original = appointment("Bruna", day(2025, 3, 11), AppointmentStatus::Agendado);
    let store: Store<Appointments> = ResourceStore::new(FakeApi::with_items(vec![original.clone()]));
    store.fetch(&AppointmentFilter::default()).await;

    let pending = desk.request_appointment(&original, AppointmentStatus::Concluido).unwrap();
    assert!(pending.requires_confirmation);
    assert_eq!(store.api().calls(), 1);

    let updated = desk.commit_appointment(pending.token, &store).await.unwrap();
    assert_eq!(updated.status, AppointmentStatus::Concluido);
    assert_eq!(updated.client_name, "Bruna");
    assert_eq!(store.find(original.id).unwrap().status, AppointmentStatus::Concluido);

    // token é de uso único
    let again = desk.commit_appointment(pending.token, &store).await.unwrap_err();
    assert!(matches!(again, barbearia::client::ClientError::Transition(TransitionError::UnknownToken(_))));
    assert_eq!(store.api().calls(), 2);
}

#[tokio::test]
async fn cancelled_confirmation_sends_nothing() {
    let desk = TransitionDesk::new();
    let original = appointment("Léo", day(2025, 3, 12), AppointmentStatus::Pendente);
    let store: Store<Appointments> = ResourceStore::new(FakeApi::with_items(vec![original.clone()]));

    let pending = desk.request_appointment(&original, AppointmentStatus::Cancelado).unwrap();
    assert!(desk.cancel(pending.token));
    assert!(desk.commit_appointment(pending.token, &store).await.is_err());
    assert_eq!(store.api().calls(), 0);
}

#[tokio::test]
async fn pending_product_without_user_is_rejected_locally() {
    let desk = TransitionDesk::new();
    let pomada = product("Pomada", ProductStatus::Disponivel);
    let store: Store<Products> = ResourceStore::new(FakeApi::with_items(vec![pomada.clone()]));

    for user in [None, Some(""), Some("   ")] {
        let err = desk.request_product(&pomada, ProductStatus::Pendente, user).unwrap_err();
        assert_eq!(err, TransitionError::PendingUserRequired);
    }
    assert_eq!(store.api().calls(), 0);
}

#[test]
fn sold_and_consumed_products_offer_no_options() {
    for status in [ProductStatus::Vendido, ProductStatus::Consumido] {
        assert!(product_status_options(&product("Gel", status)).is_empty());
    }
}

#[tokio::test]
async fn product_pending_for_carlos_then_only_sold_is_offered() {
    let desk = TransitionDesk::new();
    let shampoo = product("Shampoo", ProductStatus::Disponivel);
    let store: Store<Products> = ResourceStore::new(FakeApi::with_items(vec![shampoo.clone()]));
    assert_eq!(store.fetch(&NoQuery::default()).await, FetchOutcome::Loaded(1));

    let pending = desk.request_product(&shampoo, ProductStatus::Pendente, Some("Carlos")).unwrap();
    desk.commit_product(pending.token, &store).await.unwrap();

    let local = store.find(shampoo.id).unwrap();
    assert_eq!(local.status, ProductStatus::Pendente);
    assert_eq!(local.pending_user.as_deref(), Some("Carlos"));
    assert_eq!(product_status_options(&local), &[ProductStatus::Vendido]);

    let err = desk.request_product(&local, ProductStatus::Consumido, None).unwrap_err();
    assert!(matches!(err, TransitionError::NotAllowed { .. }));
}

#[tokio::test]
async fn status_filter_todos_and_exact_match() {
    let items = vec![
        appointment("Ana", day(2025, 3, 10), AppointmentStatus::Agendado),
        appointment("Beto", day(2025, 3, 10), AppointmentStatus::Pendente),
        appointment("Caio", day(2025, 3, 11), AppointmentStatus::Agendado),
    ];
    let store: Store<Appointments> = ResourceStore::new(FakeApi::with_items(items));
    store.fetch(&AppointmentFilter::default()).await;

    assert_eq!(store.filtered(&AppointmentFilter::default()).len(), 3);

    let only = AppointmentFilter { status: StatusFilter::Only(AppointmentStatus::Agendado), ..Default::default() };
    let names: Vec<String> = store.filtered(&only).into_iter().map(|a| a.client_name).collect();
    assert_eq!(names, vec!["Ana", "Caio"]);
}

#[tokio::test]
async fn date_filter_ignores_time_component() {
    let items = vec![
        appointment("Ana", day(2025, 3, 10), AppointmentStatus::Agendado),
        appointment("Caio", day(2025, 3, 11), AppointmentStatus::Agendado),
    ];
    let store: Store<Appointments> = ResourceStore::new(FakeApi::with_items(items));
    store.fetch(&AppointmentFilter::default()).await;

    for raw in ["2025-03-10", "2025-03-10T00:00:00.000Z", "2025-03-10T18:45:00"] {
        let filter = AppointmentFilter { date: Some(raw.into()), ..Default::default() };
        let found = store.filtered(&filter);
        assert_eq!(found.len(), 1, "filtro {raw}");
        assert_eq!(found[0].client_name, "Ana");
    }
}

#[tokio::test]
async fn add_then_fetch_round_trip() {
    let store: Store<Appointments> = ResourceStore::new(FakeApi::new());
    let payload = new_appointment("Fernanda", day(2025, 4, 2));

    store.add(&payload).await.unwrap();
    assert_eq!(store.fetch(&AppointmentFilter::default()).await, FetchOutcome::Loaded(1));

    let items = store.items();
    assert!(items.iter().any(|a| a.client_name == "Fernanda"
        && a.date == payload.date
        && a.procedure_id == payload.procedure_id));
}

#[tokio::test]
async fn duplicate_slots_are_not_rejected_by_the_client() {
    let store: Store<TimeSlots> = ResourceStore::new(FakeApi::new());
    let rafael = Uuid::new_v4();
    let slot = new_slot(rafael, day(2025, 5, 6), hm(10, 0), hm(10, 30));

    store.add(&slot).await.unwrap();
    store.add(&slot).await.unwrap();

    assert_eq!(store.items().len(), 2);
    assert_eq!(store.api().calls(), 2);
}

#[tokio::test]
async fn generated_slots_are_grouped_by_professional_and_day() {
    let store: Store<TimeSlots> = ResourceStore::new(FakeApi::new());
    let rafael = Uuid::new_v4();
    let batch = NewTimeSlotBatch {
        slots: vec![
            new_slot(rafael, day(2025, 5, 7), hm(11, 0), hm(11, 30)),
            new_slot(rafael, day(2025, 5, 6), hm(9, 0), hm(9, 30)),
            new_slot(rafael, day(2025, 5, 6), hm(8, 0), hm(8, 30)),
        ],
    };
    assert_eq!(store.generate(&batch).await.unwrap().len(), 3);

    let grouped = store.grouped();
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].days.len(), 2);
    assert_eq!(grouped[0].days[0].label, "06/05/2025");
    assert_eq!(grouped[0].days[0].slots[0].start_time, hm(8, 0));

    let empty = store.generate(&NewTimeSlotBatch { slots: vec![] }).await;
    assert!(empty.is_err());
    assert_eq!(store.api().calls(), 1);
    assert!(store.error().is_some());

    let open = SlotFilter { available: Some(true), ..Default::default() };
    assert_eq!(open.apply(&store.items()).len(), 3);
}

#[tokio::test]
async fn failed_remove_keeps_list_and_sets_error() {
    let items = vec![
        appointment("Ana", day(2025, 3, 10), AppointmentStatus::Agendado),
        appointment("Beto", day(2025, 3, 10), AppointmentStatus::Pendente),
    ];
    let target = items[0].id;
    let store: Store<Appointments> = ResourceStore::new(FakeApi::with_items(items));
    store.fetch(&AppointmentFilter::default()).await;
    let before = store.items();

    store.api().fail_next();
    assert!(store.remove(target).await.is_err());

    assert_eq!(store.items(), before);
    assert!(store.error().is_some_and(|e| !e.is_empty()));

    store.remove(target).await.unwrap();
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn failed_fetch_degrades_to_empty_list() {
    let items = vec![appointment("Ana", day(2025, 3, 10), AppointmentStatus::Agendado)];
    let store: Store<Appointments> = ResourceStore::new(FakeApi::with_items(items));
    store.fetch(&AppointmentFilter::default()).await;

    store.api().fail_next();
    assert_eq!(store.fetch(&AppointmentFilter::default()).await, FetchOutcome::Failed);
    let snapshot = store.snapshot();
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_some());
}

#[tokio::test]
async fn stale_fetch_is_discarded() {
    let first = appointment("Ana", day(2025, 3, 10), AppointmentStatus::Agendado);
    let store: Arc<Store<Appointments>> = Arc::new(ResourceStore::new(FakeApi::with_items(vec![first])));

    let release = store.api().hold_next_list();
    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch(&AppointmentFilter::default()).await }
    });
    store.api().list_started.notified().await;
    assert!(store.is_loading());

    store.api().seed(appointment("Beto", day(2025, 3, 10), AppointmentStatus::Pendente));
    assert_eq!(store.fetch(&AppointmentFilter::default()).await, FetchOutcome::Loaded(2));

    release.send(()).unwrap();
    assert_eq!(slow.await.unwrap(), FetchOutcome::Superseded);
    assert_eq!(store.items().len(), 2);
}

#[tokio::test]
async fn failed_commit_keeps_the_confirmation_for_a_retry() {
    let desk = TransitionDesk::new();
    let original = appointment("Otávio", day(2025, 3, 13), AppointmentStatus::Agendado);
    let store: Store<Appointments> = ResourceStore::new(FakeApi::with_items(vec![original.clone()]));
    store.fetch(&AppointmentFilter::default()).await;

    let pending = desk.request_appointment(&original, AppointmentStatus::EmAndamento).unwrap();
    store.api().fail_next();
    assert!(desk.commit_appointment(pending.token, &store).await.is_err());
    assert_eq!(desk.pending_count(), 1);
    assert_eq!(store.find(original.id).unwrap().status, AppointmentStatus::Agendado);

    let updated = desk.commit_appointment(pending.token, &store).await.unwrap();
    assert_eq!(updated.status, AppointmentStatus::EmAndamento);
    assert_eq!(desk.pending_count(), 0);
}

#[tokio::test]
async fn product_token_is_not_accepted_for_an_appointment() {
    let desk = TransitionDesk::new();
    let pomada = product("Pomada", ProductStatus::Disponivel);
    let appointments: Store<Appointments> = ResourceStore::new(FakeApi::new());

    let pending = desk.request_product(&pomada, ProductStatus::Vendido, None).unwrap();
    let err = desk.commit_appointment(pending.token, &appointments).await.unwrap_err();
    assert!(matches!(err, barbearia::client::ClientError::Transition(TransitionError::UnknownToken(_))));
    assert_eq!(desk.pending_count(), 1);
    assert_eq!(appointments.api().calls(), 0);
}

#[test]
fn repeated_requests_keep_one_confirmation_per_item() {
    let desk = TransitionDesk::new();
    let bruna = appointment("Bruna", day(2025, 3, 14), AppointmentStatus::Pendente);

    let first = desk.request_appointment(&bruna, AppointmentStatus::Agendado).unwrap();
    let second = desk.request_appointment(&bruna, AppointmentStatus::Cancelado).unwrap();
    assert_ne!(first.token, second.token);
    assert_eq!(desk.pending_count(), 1);
    assert!(!desk.cancel(first.token));
    assert!(desk.cancel(second.token));
}
