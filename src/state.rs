use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{jwt::JwtKeys, password::CredentialHasher, repo::UserRepo};
use crate::cart::repo::CartRepo;
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::products::repo::ProductRepo;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub hasher: CredentialHasher,
    pub users: Arc<dyn UserRepo>,
    pub products: Arc<dyn ProductRepo>,
    pub cart: Arc<dyn CartRepo>,
}

impl AppState {
    pub fn from_pool(config: AppConfig, pool: PgPool) -> anyhow::Result<Self> {
        let store = Arc::new(PgStore::new(pool));
        Self::from_parts(
            config,
            store.clone() as Arc<dyn UserRepo>,
            store.clone() as Arc<dyn ProductRepo>,
            store as Arc<dyn CartRepo>,
        )
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepo>,
        products: Arc<dyn ProductRepo>,
        cart: Arc<dyn CartRepo>,
    ) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt);
        let hasher = CredentialHasher::new(&config.password)?;
        Ok(Self {
            config: Arc::new(config),
            keys,
            hasher,
            users,
            products,
            cart,
        })
    }
}
