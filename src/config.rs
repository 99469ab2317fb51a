// src/config.rs

use std::{env, net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::Store,
    services::{
        auth::AuthService, catalog_service::CatalogService, product_service::ProductService,
        purchase_service::PurchaseService, sale_service::SaleService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: SocketAddr,
    pub database_max_connections: u32,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} deve ser definida", key));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_addr: parse_or(&lookup, "SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_expiration_hours: parse_or(&lookup, "JWT_EXPIRATION_HOURS", 168)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Valor inválido para {}: {} ({})", key, raw, e)),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub product_service: ProductService,
    pub purchase_service: PurchaseService,
    pub sale_service: SaleService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            auth_service: AuthService::new(
                store.clone(),
                config.jwt_secret.clone(),
                config.jwt_expiration_hours,
                config.bcrypt_cost,
            ),
            catalog_service: CatalogService::new(store.clone()),
            product_service: ProductService::new(store.clone()),
            purchase_service: PurchaseService::new(store.clone()),
            sale_service: SaleService::new(store),
        }
    }
}
