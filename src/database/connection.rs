//! Conexión a MySQL
//!
//! Este módulo abre el pool de conexiones y aplica las migraciones del schema.

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};

/// Envoltura del pool de conexiones
pub struct DatabaseConnection {
    pool: MySqlPool,
}

impl DatabaseConnection {
    /// Conectar usando la configuración dada
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🔌 Conectando a {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("No se pudo conectar a la base de datos")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Aplicar las migraciones embebidas en `migrations/`
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Error aplicando migraciones")?;

        info!("✅ Migraciones aplicadas");
        Ok(())
    }

    /// Verificar que la conexión funciona
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("La base de datos no responde")?;
        Ok(())
    }
}
