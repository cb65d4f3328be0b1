// tests/services.rs
//
// Regras garantidas pelo servidor, contra um Postgres de verdade.
// `sqlx::test` cria um banco isolado por teste (precisa de DATABASE_URL).

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use barbearia::{
    common::error::AppError,
    config::{AppState, Config},
    domain::{ledger::LedgerQuery, lifecycle::TransitionError},
    models::{
        appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment},
        finance::FinancialStatus,
        procedure::{NewProcedure, Procedure},
        product::{NewProduct, ProductPatch, ProductStatus},
        professional::{NewProfessional, Professional},
        time_slot::{NewTimeSlot, TimeSlot},
    },
};

fn state(pool: PgPool) -> AppState {
    let config = Config {
        database_url: String::new(),
        jwt_secret: "segredo-de-teste".into(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        token_ttl_hours: 1,
        db_max_connections: 1,
        admin_email: "admin@barbearia.local".into(),
        admin_password: "admin123".into(),
    };
    AppState::from_parts(&config, pool)
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn barber(state: &AppState, name: &str) -> (Professional, Procedure) {
    let professional = state
        .professional_service
        .create(&NewProfessional {
            name: name.into(),
            email: format!("{}@barbearia.local", name.to_lowercase()),
            phone: "11999990000".into(),
        })
        .await
        .unwrap();
    let procedure = state
        .procedure_service
        .create(&NewProcedure {
            name: "Corte".into(),
            price: Decimal::new(4500, 2),
            professional_id: professional.id,
        })
        .await
        .unwrap();
    (professional, procedure)
}

async fn slot(state: &AppState, professional_id: Uuid, start: NaiveTime) -> TimeSlot {
    state
        .schedule_service
        .create_one(&NewTimeSlot {
            professional_id,
            date: day(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(30),
        })
        .await
        .unwrap()
}

fn booking(procedure: &Procedure, slot_id: Option<Uuid>) -> NewAppointment {
    NewAppointment {
        client_name: "Fernanda".into(),
        client_phone: "11988887777".into(),
        client_email: None,
        date: day(),
        time_slot_id: slot_id,
        start_time: slot_id.is_none().then(|| hm(15, 0)),
        end_time: None,
        procedure_id: procedure.id,
        professional_id: procedure.professional_id,
        status: None,
    }
}

async fn is_free(state: &AppState, slot: &TimeSlot) -> bool {
    state
        .schedule_service
        .available(slot.professional_id, slot.date)
        .await
        .unwrap()
        .iter()
        .any(|s| s.id == slot.id)
}

async fn book(state: &AppState, procedure: &Procedure, slot: &TimeSlot) -> Appointment {
    state
        .appointment_service
        .create(&booking(procedure, Some(slot.id)))
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn booking_claims_the_slot_once(pool: PgPool) {
    let state = state(pool);
    let (rafael, corte) = barber(&state, "Rafael").await;
    let nove = slot(&state, rafael.id, hm(9, 0)).await;

    let appointment = book(&state, &corte, &nove).await;
    assert_eq!(appointment.time_slot_id, Some(nove.id));
    assert_eq!(appointment.start_time, Some(hm(9, 0)));
    assert_eq!(appointment.end_time, Some(hm(9, 30)));
    assert_eq!(appointment.procedure_name, "Corte");
    assert_eq!(appointment.professional_name, "Rafael");
    assert!(!is_free(&state, &nove).await);

    let taken = state
        .appointment_service
        .create(&booking(&corte, Some(nove.id)))
        .await
        .unwrap_err();
    assert!(matches!(taken, AppError::SlotUnavailable));
    assert_eq!(taken.status_code().as_u16(), 409);
}

#[sqlx::test(migrations = "./migrations")]
async fn slot_of_another_professional_is_refused(pool: PgPool) {
    let state = state(pool);
    let (_, corte) = barber(&state, "Rafael").await;
    let (bruno, _) = barber(&state, "Bruno").await;
    let do_bruno = slot(&state, bruno.id, hm(9, 0)).await;

    let err = state
        .appointment_service
        .create(&booking(&corte, Some(do_bruno.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SlotUnavailable));
    // a transação foi desfeita: o horário continua livre
    assert!(is_free(&state, &do_bruno).await);
}

#[sqlx::test(migrations = "./migrations")]
async fn cancel_and_no_show_release_the_slot(pool: PgPool) {
    let state = state(pool);
    let (rafael, corte) = barber(&state, "Rafael").await;

    for (start, status) in [
        (hm(9, 0), AppointmentStatus::Cancelado),
        (hm(10, 0), AppointmentStatus::NaoCompareceu),
    ] {
        let horario = slot(&state, rafael.id, start).await;
        let appointment = book(&state, &corte, &horario).await;
        assert!(!is_free(&state, &horario).await);

        let updated = state
            .appointment_service
            .update(appointment.id, &AppointmentPatch::status_only(status))
            .await
            .unwrap();
        assert_eq!(updated.status, status);
        assert!(is_free(&state, &horario).await, "{status} deve liberar o horário");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_an_open_appointment_gives_the_slot_back(pool: PgPool) {
    let state = state(pool);
    let (rafael, corte) = barber(&state, "Rafael").await;
    let nove = slot(&state, rafael.id, hm(9, 0)).await;
    let appointment = book(&state, &corte, &nove).await;

    state.appointment_service.delete(appointment.id).await.unwrap();
    assert!(is_free(&state, &nove).await);

    let gone = state.appointment_service.get(appointment.id).await.unwrap_err();
    assert!(matches!(gone, AppError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn completion_records_one_pending_entry(pool: PgPool) {
    let state = state(pool);
    let (_, corte) = barber(&state, "Rafael").await;
    let appointment = state.appointment_service.create(&booking(&corte, None)).await.unwrap();

    state
        .appointment_service
        .update(appointment.id, &AppointmentPatch::status_only(AppointmentStatus::Concluido))
        .await
        .unwrap();
    // reenviar o mesmo status e editar o cliente não geram outro lançamento
    state
        .appointment_service
        .update(appointment.id, &AppointmentPatch::status_only(AppointmentStatus::Concluido))
        .await
        .unwrap();
    state
        .appointment_service
        .update(
            appointment.id,
            &AppointmentPatch { client_name: Some("Fernanda Lima".into()), ..Default::default() },
        )
        .await
        .unwrap();

    let ledger = state.finance_service.ledger(&LedgerQuery::default()).await.unwrap();
    assert_eq!(ledger.entries.len(), 1);
    let entry = &ledger.entries[0];
    assert_eq!(entry.status, FinancialStatus::Pendente);
    assert_eq!(entry.amount, Decimal::new(4500, 2));
    assert_eq!(entry.client_name, "Fernanda");
    assert_eq!(entry.procedure_description, "Corte");
}

#[sqlx::test(migrations = "./migrations")]
async fn terminal_appointment_rejects_status_changes(pool: PgPool) {
    let state = state(pool);
    let (_, corte) = barber(&state, "Rafael").await;
    let appointment = state.appointment_service.create(&booking(&corte, None)).await.unwrap();
    state
        .appointment_service
        .update(appointment.id, &AppointmentPatch::status_only(AppointmentStatus::Cancelado))
        .await
        .unwrap();

    let err = state
        .appointment_service
        .update(appointment.id, &AppointmentPatch::status_only(AppointmentStatus::Agendado))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transition(TransitionError::Terminal(_))));
    assert_eq!(err.status_code().as_u16(), 409);

    let stored = state.appointment_service.get(appointment.id).await.unwrap();
    assert_eq!(stored.status, AppointmentStatus::Cancelado);
}

#[sqlx::test(migrations = "./migrations")]
async fn moving_to_another_professional_unlinks_and_frees_the_slot(pool: PgPool) {
    let state = state(pool);
    let (rafael, corte) = barber(&state, "Rafael").await;
    let (bruno, barba) = barber(&state, "Bruno").await;
    let nove = slot(&state, rafael.id, hm(9, 0)).await;
    let appointment = book(&state, &corte, &nove).await;

    let moved = state
        .appointment_service
        .update(
            appointment.id,
            &AppointmentPatch {
                professional_id: Some(bruno.id),
                procedure_id: Some(barba.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.professional_id, bruno.id);
    assert_eq!(moved.professional_name, "Bruno");
    assert_eq!(moved.time_slot_id, None);
    assert!(is_free(&state, &nove).await);
}

#[sqlx::test(migrations = "./migrations")]
async fn new_slot_in_patch_swaps_the_reservation(pool: PgPool) {
    let state = state(pool);
    let (rafael, corte) = barber(&state, "Rafael").await;
    let nove = slot(&state, rafael.id, hm(9, 0)).await;
    let onze = slot(&state, rafael.id, hm(11, 0)).await;
    let appointment = book(&state, &corte, &nove).await;

    let moved = state
        .appointment_service
        .update(
            appointment.id,
            &AppointmentPatch { time_slot_id: Some(onze.id), ..Default::default() },
        )
        .await
        .unwrap();

    assert_eq!(moved.time_slot_id, Some(onze.id));
    assert_eq!(moved.start_time, Some(hm(11, 0)));
    assert!(is_free(&state, &nove).await);
    assert!(!is_free(&state, &onze).await);

    // um horário já ocupado não pode ser tomado por outra edição
    let other = state.appointment_service.create(&booking(&corte, None)).await.unwrap();
    let err = state
        .appointment_service
        .update(other.id, &AppointmentPatch { time_slot_id: Some(onze.id), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SlotUnavailable));
}

#[sqlx::test(migrations = "./migrations")]
async fn professional_in_use_cannot_be_deleted(pool: PgPool) {
    let state = state(pool);
    let (rafael, corte) = barber(&state, "Rafael").await;

    let err = state.professional_service.delete(rafael.id).await.unwrap_err();
    assert!(matches!(err, AppError::ProfessionalInUse));
    assert_eq!(err.status_code().as_u16(), 409);

    // sem procedimentos nem agendamentos sai, levando os horários junto
    state.procedure_service.delete(corte.id).await.unwrap();
    let nove = slot(&state, rafael.id, hm(9, 0)).await;
    state.professional_service.delete(rafael.id).await.unwrap();
    assert!(!is_free(&state, &nove).await);
    assert!(matches!(
        state.professional_service.get_detail(rafael.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn procedure_in_use_cannot_be_deleted(pool: PgPool) {
    let state = state(pool);
    let (_, corte) = barber(&state, "Rafael").await;
    state.appointment_service.create(&booking(&corte, None)).await.unwrap();

    let err = state.procedure_service.delete(corte.id).await.unwrap_err();
    assert!(matches!(err, AppError::ProcedureInUse));
    assert_eq!(err.status_code().as_u16(), 409);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slot_is_a_conflict_and_batch_is_all_or_nothing(pool: PgPool) {
    let state = state(pool);
    let (rafael, _) = barber(&state, "Rafael").await;
    slot(&state, rafael.id, hm(9, 0)).await;

    let duplicate = NewTimeSlot { professional_id: rafael.id, date: day(), start_time: hm(9, 0), end_time: hm(9, 45) };
    let err = state.schedule_service.create_one(&duplicate).await.unwrap_err();
    assert!(matches!(err, AppError::SlotAlreadyExists));

    let fresh = NewTimeSlot { professional_id: rafael.id, date: day(), start_time: hm(14, 0), end_time: hm(14, 30) };
    let err = state.schedule_service.create_batch(&[fresh, duplicate]).await.unwrap_err();
    assert!(matches!(err, AppError::SlotAlreadyExists));
    assert_eq!(state.schedule_service.available(rafael.id, day()).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn leaving_pendente_clears_the_responsible_user(pool: PgPool) {
    let state = state(pool);
    let shampoo = state
        .product_service
        .create(&NewProduct {
            name: "Shampoo".into(),
            category: "Cabelo".into(),
            price: Decimal::new(2990, 2),
            stock: 3,
            description: None,
            status: None,
            pending_user: None,
        })
        .await
        .unwrap();
    assert_eq!(shampoo.status, ProductStatus::Disponivel);

    let missing = state
        .product_service
        .update(shampoo.id, &ProductPatch::status_change(ProductStatus::Pendente, None))
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::Transition(TransitionError::PendingUserRequired)));

    let pending = state
        .product_service
        .update(shampoo.id, &ProductPatch::status_change(ProductStatus::Pendente, Some("Carlos".into())))
        .await
        .unwrap();
    assert_eq!(pending.pending_user.as_deref(), Some("Carlos"));

    let sold = state
        .product_service
        .update(shampoo.id, &ProductPatch::status_change(ProductStatus::Vendido, None))
        .await
        .unwrap();
    assert_eq!(sold.status, ProductStatus::Vendido);
    assert_eq!(sold.pending_user, None);

    let err = state
        .product_service
        .update(shampoo.id, &ProductPatch::status_change(ProductStatus::Disponivel, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transition(TransitionError::Terminal(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_is_seeded_once(pool: PgPool) {
    let state = state(pool.clone());

    assert!(state.auth_service.seed_admin(&pool, "admin@barbearia.local", "admin123").await.unwrap());
    assert!(!state.auth_service.seed_admin(&pool, "ADMIN@barbearia.local", "outra-senha").await.unwrap());

    let auth = state.auth_service.login_user("admin@barbearia.local", "admin123").await.unwrap();
    assert_eq!(auth.role, "admin");
    assert!(matches!(
        state.auth_service.login_user("admin@barbearia.local", "outra-senha").await.unwrap_err(),
        AppError::InvalidCredentials
    ));
}
