// src/domain/lifecycle.rs
//
// Máquinas de estado dos agendamentos e dos produtos.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{appointment::AppointmentStatus, product::ProductStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("O status '{0}' é final e não aceita alterações.")]
    Terminal(&'static str),

    #[error("Transição de '{from}' para '{to}' não é permitida.")]
    NotAllowed { from: &'static str, to: &'static str },

    #[error("Informe o responsável pelo produto pendente.")]
    PendingUserRequired,

    #[error("Confirmação '{0}' inexistente ou já utilizada.")]
    UnknownToken(Uuid),
}

/// Um conjunto de status com transições restritas.
pub trait StatusMachine: Copy + Eq + 'static {
    /// Status oferecidos a partir do atual. Vazio = status final.
    fn next_states(self) -> &'static [Self];

    /// A troca exige um passo de confirmação explícito.
    fn requires_confirmation(self, target: Self) -> bool;

    fn label(self) -> &'static str;

    fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }

    fn can_transition_to(self, target: Self) -> bool {
        self.next_states().contains(&target)
    }

    fn check_transition(self, target: Self) -> Result<(), TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self.label()));
        }
        if !self.can_transition_to(target) {
            return Err(TransitionError::NotAllowed { from: self.label(), to: target.label() });
        }
        Ok(())
    }
}

// ---
// Agendamentos
// ---

use AppointmentStatus as A;

const FROM_PENDENTE: &[A] = &[A::Agendado, A::EmAndamento, A::Concluido, A::Cancelado, A::NaoCompareceu];
const FROM_AGENDADO: &[A] = &[A::Pendente, A::EmAndamento, A::Concluido, A::Cancelado, A::NaoCompareceu];
const FROM_EM_ANDAMENTO: &[A] = &[A::Pendente, A::Agendado, A::Concluido, A::Cancelado, A::NaoCompareceu];

impl StatusMachine for AppointmentStatus {
    fn next_states(self) -> &'static [Self] {
        match self {
            A::Pendente => FROM_PENDENTE,
            A::Agendado => FROM_AGENDADO,
            A::EmAndamento => FROM_EM_ANDAMENTO,
            A::Concluido | A::Cancelado | A::NaoCompareceu => &[],
        }
    }

    fn requires_confirmation(self, target: Self) -> bool {
        target.is_terminal()
    }

    fn label(self) -> &'static str {
        AppointmentStatus::label(self)
    }
}

// ---
// Produtos
// ---

use ProductStatus as P;

const FROM_DISPONIVEL: &[P] = &[P::Vendido, P::Consumido, P::Pendente];
const FROM_PRODUTO_PENDENTE: &[P] = &[P::Vendido];

impl StatusMachine for ProductStatus {
    fn next_states(self) -> &'static [Self] {
        match self {
            P::Disponivel => FROM_DISPONIVEL,
            P::Pendente => FROM_PRODUTO_PENDENTE,
            P::Vendido | P::Consumido => &[],
        }
    }

    fn requires_confirmation(self, _target: Self) -> bool {
        true
    }

    fn label(self) -> &'static str {
        ProductStatus::label(self)
    }
}

/// Regra completa de troca de status de produto: adjacência + responsável.
pub fn check_product_transition(
    from: ProductStatus,
    to: ProductStatus,
    pending_user: Option<&str>,
) -> Result<(), TransitionError> {
    if to == ProductStatus::Pendente && pending_user.map(str::trim).is_none_or(str::is_empty) {
        return Err(TransitionError::PendingUserRequired);
    }
    from.check_transition(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_APPOINTMENT: [A; 6] = [
        A::Pendente, A::Agendado, A::EmAndamento, A::Concluido, A::Cancelado, A::NaoCompareceu,
    ];

    #[test]
    fn terminal_appointments_offer_nothing() {
        for status in [A::Concluido, A::Cancelado, A::NaoCompareceu] {
            assert!(status.is_terminal());
            assert!(status.next_states().is_empty());
            for target in ALL_APPOINTMENT {
                assert_eq!(
                    status.check_transition(target),
                    Err(TransitionError::Terminal(status.label()))
                );
            }
        }
    }

    #[test]
    fn open_appointments_reach_every_other_state() {
        for status in [A::Pendente, A::Agendado, A::EmAndamento] {
            for target in ALL_APPOINTMENT {
                assert_eq!(status.can_transition_to(target), status != target);
            }
        }
    }

    #[test]
    fn only_terminal_targets_need_confirmation() {
        assert!(A::Agendado.requires_confirmation(A::Concluido));
        assert!(A::Pendente.requires_confirmation(A::NaoCompareceu));
        assert!(!A::Pendente.requires_confirmation(A::EmAndamento));
    }

    #[test]
    fn product_adjacency() {
        assert_eq!(P::Disponivel.next_states(), &[P::Vendido, P::Consumido, P::Pendente]);
        assert_eq!(P::Pendente.next_states(), &[P::Vendido]);
        assert!(P::Vendido.next_states().is_empty());
        assert!(P::Consumido.next_states().is_empty());
    }

    #[test]
    fn pending_product_needs_a_responsible_user() {
        assert_eq!(
            check_product_transition(P::Disponivel, P::Pendente, Some("  ")),
            Err(TransitionError::PendingUserRequired)
        );
        assert_eq!(
            check_product_transition(P::Disponivel, P::Pendente, None),
            Err(TransitionError::PendingUserRequired)
        );
        assert!(check_product_transition(P::Disponivel, P::Pendente, Some("Carlos")).is_ok());
        assert!(check_product_transition(P::Pendente, P::Vendido, None).is_ok());
    }

    #[test]
    fn pending_product_cannot_be_consumed() {
        assert_eq!(
            check_product_transition(P::Pendente, P::Consumido, None),
            Err(TransitionError::NotAllowed { from: "pendente", to: "consumido" })
        );
    }
}
