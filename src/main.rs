use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use car_rental_api::config::{DatabaseConfig, EnvironmentConfig};
use car_rental_api::database::DatabaseConnection;
use car_rental_api::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚗 Car Rental API - CRM y portal de clientes");
    info!("============================================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new(&DatabaseConfig::new(&config.database_url)).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    if config.run_migrations {
        db_connection.run_migrations().await?;
    } else {
        warn!("⏭️ Migraciones deshabilitadas (RUN_MIGRATIONS=false)");
    }
    db_connection.health_check().await?;

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_app(AppState::new(db_connection.pool().clone(), config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("🔐 /api/auth: login, register, me, profile, permissions");
    info!("👤 /api/users · 🚗 /api/vehiculos · 🧾 /api/clientes");
    info!("📅 /api/reservas · 💰 /api/facturas · 📝 /api/contratos");
    info!("🔧 /api/mantenimiento · 📊 /api/dashboard");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
