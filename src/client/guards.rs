// src/client/guards.rs
//
// Checagens de tela feitas antes de chamar a API. O servidor aplica as
// mesmas regras; aqui só evitamos a ida e volta.

use uuid::Uuid;

use crate::{
    domain::lifecycle::StatusMachine,
    models::{
        appointment::{Appointment, AppointmentStatus},
        procedure::Procedure,
        product::{Product, ProductStatus},
    },
};

/// O que impede a remoção de um profissional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteBlockers {
    pub procedures: usize,
    pub appointments: usize,
}

impl DeleteBlockers {
    pub fn is_clear(&self) -> bool {
        self.procedures == 0 && self.appointments == 0
    }
}

pub fn professional_blockers(
    professional_id: Uuid,
    procedures: &[Procedure],
    appointments: &[Appointment],
) -> DeleteBlockers {
    DeleteBlockers {
        procedures: procedures.iter().filter(|p| p.professional_id == professional_id).count(),
        appointments: appointments.iter().filter(|a| a.professional_id == professional_id).count(),
    }
}

pub fn can_delete_professional(
    professional_id: Uuid,
    procedures: &[Procedure],
    appointments: &[Appointment],
) -> bool {
    professional_blockers(professional_id, procedures, appointments).is_clear()
}

/// Opções do seletor de status; vazio = controle desabilitado.
pub fn appointment_status_options(appointment: &Appointment) -> &'static [AppointmentStatus] {
    appointment.status.next_states()
}

pub fn product_status_options(product: &Product) -> &'static [ProductStatus] {
    product.status.next_states()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn procedure(professional_id: Uuid) -> Procedure {
        Procedure {
            id: Uuid::new_v4(),
            name: "Corte".into(),
            price: Decimal::new(3500, 2),
            professional_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn appointment(professional_id: Uuid, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            client_name: "João".into(),
            client_phone: "11999990000".into(),
            client_email: None,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time_slot_id: None,
            start_time: None,
            end_time: None,
            procedure_id: Uuid::new_v4(),
            procedure_name: "Corte".into(),
            procedure_price: Decimal::new(3500, 2),
            professional_id,
            professional_name: "Rafael".into(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn professional_with_references_cannot_be_deleted() {
        let rafael = Uuid::new_v4();
        let other = Uuid::new_v4();
        let procedures = vec![procedure(rafael)];
        let appointments = vec![appointment(other, AppointmentStatus::Agendado)];

        assert!(!can_delete_professional(rafael, &procedures, &appointments));
        assert_eq!(
            professional_blockers(other, &procedures, &appointments),
            DeleteBlockers { procedures: 0, appointments: 1 }
        );
        assert!(can_delete_professional(Uuid::new_v4(), &procedures, &appointments));
    }

    #[test]
    fn terminal_appointment_disables_selector() {
        let done = appointment(Uuid::new_v4(), AppointmentStatus::Concluido);
        assert!(appointment_status_options(&done).is_empty());

        let open = appointment(Uuid::new_v4(), AppointmentStatus::Agendado);
        assert!(appointment_status_options(&open).contains(&AppointmentStatus::Concluido));
    }
}
