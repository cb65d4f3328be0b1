// src/config.rs

use std::{env, net::SocketAddr, time::Duration};

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        AppointmentRepository, FinanceRepository, ProcedureRepository, ProductRepository,
        ProfessionalRepository, TimeSlotRepository, UserRepository,
    },
    services::{
        appointment_service::AppointmentService, auth::AuthService, finance_service::FinanceService,
        procedure_service::ProcedureService, product_service::ProductService,
        professional_service::ProfessionalService, schedule_service::ScheduleService,
    },
};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@barbearia.local";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Configuração lida do ambiente (com `.env` opcional).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub token_ttl_hours: i64,
    pub db_max_connections: u32,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR inválido")?;
        let token_ttl_hours = parse_or("TOKEN_TTL_HOURS", 168)?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 5)?;

        let admin_email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("⚠️ ADMIN_PASSWORD não definido; usando a senha padrão do administrador");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            token_ttl_hours,
            db_max_connections,
            admin_email,
            admin_password,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("{} inválido: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub appointment_service: AppointmentService,
    pub schedule_service: ScheduleService,
    pub professional_service: ProfessionalService,
    pub procedure_service: ProcedureService,
    pub product_service: ProductService,
    pub finance_service: FinanceService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(Self::from_parts(config, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(config: &Config, db_pool: PgPool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let professional_repo = ProfessionalRepository::new(db_pool.clone());
        let procedure_repo = ProcedureRepository::new(db_pool.clone());
        let slot_repo = TimeSlotRepository::new(db_pool.clone());
        let appointment_repo = AppointmentRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.token_ttl_hours),
        );
        let finance_service = FinanceService::new(finance_repo);
        let appointment_service = AppointmentService::new(
            appointment_repo,
            slot_repo.clone(),
            procedure_repo.clone(),
            professional_repo.clone(),
            finance_service.clone(),
            db_pool.clone(),
        );
        let schedule_service = ScheduleService::new(slot_repo, db_pool.clone());
        let professional_service =
            ProfessionalService::new(professional_repo, procedure_repo.clone(), db_pool.clone());
        let procedure_service = ProcedureService::new(procedure_repo, db_pool.clone());
        let product_service = ProductService::new(product_repo, db_pool.clone());

        Self {
            db_pool,
            auth_service,
            appointment_service,
            schedule_service,
            professional_service,
            procedure_service,
            product_service,
            finance_service,
        }
    }
}
