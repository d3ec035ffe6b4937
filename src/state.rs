//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::MySqlPool;
use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::services::jwt_service::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(pool: MySqlPool, config: EnvironmentConfig) -> Self {
        let jwt = JwtService::from_config(&config);

        Self {
            pool,
            config: Arc::new(config),
            jwt,
        }
    }
}
