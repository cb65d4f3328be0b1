// src/client/session.rs

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::models::auth::{ROLE_ADMIN, ROLE_PROFESSIONAL};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionData {
    token: String,
    role: String,
}

/// Sessão explícita do painel, compartilhada entre os clientes.
///
/// Clonar a sessão compartilha o mesmo estado; `clear` em um clone
/// desloga todos.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<SessionData>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>, role: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(SessionData { token: token.into(), role: role.into() });
    }

    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|d| d.token.clone())
    }

    pub fn role(&self) -> Option<String> {
        self.read().as_ref().map(|d| d.role.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(|d| d.role == ROLE_ADMIN)
    }

    pub fn is_staff(&self) -> bool {
        self.read()
            .as_ref()
            .is_some_and(|d| d.role == ROLE_ADMIN || d.role == ROLE_PROFESSIONAL)
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SessionData>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let session = Session::new();
        let other = session.clone();
        session.set("abc", ROLE_ADMIN);
        assert_eq!(other.token().as_deref(), Some("abc"));
        assert!(other.is_admin());

        other.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn professional_is_staff_but_not_admin() {
        let session = Session::new();
        session.set("t", ROLE_PROFESSIONAL);
        assert!(session.is_staff());
        assert!(!session.is_admin());
    }
}
