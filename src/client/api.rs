// src/client/api.rs

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    client::{
        error::ClientError,
        resource::{Appointments, DetailResource, Professionals, Resource, TimeSlots, WritableResource},
        session::Session,
    },
    common::envelope::ApiEnvelope,
    models::{
        auth::{AuthResponse, LoginUserPayload, SessionInfo},
        professional::ProfessionalDetail,
        time_slot::{NewTimeSlotBatch, TimeSlot},
    },
};

// ====
// Contratos (implementados pelo cliente HTTP e por dublês nos testes)
// ====

#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    async fn list(&self, query: &R::Query) -> Result<Vec<R::Item>, ClientError>;
}

#[async_trait]
pub trait ResourceWriteApi<R: WritableResource>: ResourceApi<R> {
    async fn create(&self, payload: &R::Create) -> Result<R::Item, ClientError>;
    async fn update(&self, id: Uuid, patch: &R::Patch) -> Result<R::Item, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

/// Geração de horários em lote (tudo ou nada).
#[async_trait]
pub trait BatchCreateApi: ResourceWriteApi<TimeSlots> {
    async fn create_batch(&self, batch: &NewTimeSlotBatch) -> Result<Vec<TimeSlot>, ClientError>;
}

// ====
// Transporte
// ====

/// Base do cliente: URL da API + sessão compartilhada.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// `base_url` inclui o prefixo `/api` (ex.: `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, session)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, session: Session) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient { api: self.clone(), _resource: PhantomData }
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient { api: self.clone() }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Erro inesperado").to_string());
            tracing::debug!("API respondeu {}: {}", status, message);
            return Err(ClientError::Api { status: status.as_u16(), message });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.execute(request)
            .await?
            .data
            .ok_or_else(|| ClientError::Decode("resposta sem o campo `data`".to_string()))
    }
}

/// Cliente de um recurso (`R` só fixa tipos e caminhos).
pub struct ResourceClient<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self { api: self.api.clone(), _resource: PhantomData }
    }
}

impl<R: DetailResource> ResourceClient<R> {
    pub async fn get(&self, id: Uuid) -> Result<R::Item, ClientError> {
        self.api.data(self.api.request(Method::GET, &R::detail_path(id))).await
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for ResourceClient<R> {
    async fn list(&self, query: &R::Query) -> Result<Vec<R::Item>, ClientError> {
        let request = self.api.request(Method::GET, &R::list_path()).query(query);
        let listing: R::Listing = self.api.data(request).await?;
        Ok(R::into_items(listing))
    }
}

#[async_trait]
impl<R: WritableResource> ResourceWriteApi<R> for ResourceClient<R> {
    async fn create(&self, payload: &R::Create) -> Result<R::Item, ClientError> {
        let request = self.api.request(Method::POST, &R::create_path()).json(payload);
        self.api.data(request).await
    }

    async fn update(&self, id: Uuid, patch: &R::Patch) -> Result<R::Item, ClientError> {
        let body = R::update_body(id, patch).map_err(|e| ClientError::Decode(e.to_string()))?;
        let request = self.api.request(Method::PUT, &R::update_path(id)).json(&body);
        self.api.data(request).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let request = self.api.request(Method::DELETE, &R::delete_path(id));
        self.api.execute::<serde_json::Value>(request).await?;
        Ok(())
    }
}

#[async_trait]
impl BatchCreateApi for ResourceClient<TimeSlots> {
    async fn create_batch(&self, batch: &NewTimeSlotBatch) -> Result<Vec<TimeSlot>, ClientError> {
        let request = self.api.request(Method::POST, "/horario/create").json(batch);
        self.api.data(request).await
    }
}

impl ResourceClient<TimeSlots> {
    /// Horários livres do profissional, de hoje em diante.
    pub async fn by_professional(&self, professional_id: Uuid) -> Result<Vec<TimeSlot>, ClientError> {
        let path = format!("/horario/barbeiro/{professional_id}");
        self.api.data(self.api.request(Method::GET, &path)).await
    }
}

impl ResourceClient<Appointments> {
    /// Horários livres do profissional em um dia (tela pública de agendamento).
    pub async fn available_slots(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, ClientError> {
        let request = self
            .api
            .request(Method::GET, "/appointment/horarios-disponiveis")
            .query(&[("barbeiro", professional_id.to_string()), ("data", date.to_string())]);
        self.api.data(request).await
    }
}

impl ResourceClient<Professionals> {
    pub async fn detail(&self, id: Uuid) -> Result<ProfessionalDetail, ClientError> {
        self.api.data(self.api.request(Method::GET, &Professionals::detail_path(id))).await
    }
}

// ====
// Autenticação
// ====

#[derive(Debug, Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// Autentica e grava token + papel na sessão.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let payload = LoginUserPayload { email: email.to_string(), password: password.to_string() };
        let request = self.api.request(Method::POST, "/auth/login").json(&payload);
        let auth: AuthResponse = self.api.data(request).await?;

        self.api.session.set(auth.token.clone(), auth.role.clone());
        tracing::info!("Sessão iniciada ({})", auth.role);
        Ok(auth)
    }

    pub async fn verify(&self) -> Result<SessionInfo, ClientError> {
        if !self.api.session.is_authenticated() {
            return Err(ClientError::NotAuthenticated);
        }
        self.api.data(self.api.request(Method::GET, "/auth/verify")).await
    }

    /// Revoga o token no servidor. A sessão local é limpa mesmo se a chamada falhar.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if !self.api.session.is_authenticated() {
            return Ok(());
        }
        let result = self
            .api
            .execute::<serde_json::Value>(self.api.request(Method::POST, "/auth/logout"))
            .await;
        self.api.session.clear();

        if let Err(e) = &result {
            tracing::warn!("Logout no servidor falhou; sessão local encerrada mesmo assim: {}", e);
        }
        result.map(|_| ())
    }
}
