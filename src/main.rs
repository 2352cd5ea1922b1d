use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use ride_dispatch::config::environment::{EnvironmentConfig, StorageBackend};
use ride_dispatch::database::{create_pool, ensure_schema, mask_database_url};
use ride_dispatch::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚕 Ride Dispatch - API de viajes");
    info!("================================================");

    let app_state = match config.storage_backend {
        StorageBackend::Memory => {
            info!("💾 Backend de almacenamiento: memoria (los datos se pierden al reiniciar)");
            AppState::in_memory(config.clone())
        }
        StorageBackend::Postgres => {
            let database = config
                .database_config()
                .context("DATABASE_URL must be set when STORAGE_BACKEND=postgres")?;
            info!("🐘 Backend de almacenamiento: PostgreSQL ({})", mask_database_url(&database.url));

            let pool = create_pool(&database).await?;
            ensure_schema(&pool).await?;
            info!("✅ Base de datos conectada exitosamente");
            AppState::postgres(config.clone(), pool)
        }
    };

    let app = create_router(app_state);

    let addr = config.server_url();
    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🧍 Pasajeros:");
    info!("   POST /passengers - Registrar pasajero");
    info!("   GET  /passengers - Listar pasajeros");
    info!("   GET  /passengers/:id - Obtener pasajero");
    info!("   DELETE /passengers/:id - Eliminar pasajero");
    info!("🚗 Conductores:");
    info!("   POST /drivers - Registrar conductor");
    info!("   GET  /drivers - Listar conductores");
    info!("   GET  /drivers/:id - Obtener conductor");
    info!("   DELETE /drivers/:id - Eliminar conductor");
    info!("🚕 Viajes:");
    info!("   POST /rides - Crear viaje");
    info!("   GET  /rides - Listar viajes");
    info!("   GET  /rides/:id - Obtener viaje");
    info!("   PUT  /rides/:id/driver - Asignar conductor");
    info!("   PUT  /rides/:id/status - Cambiar estado");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("No se pudo abrir {}", addr))?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("⚠️ No se pudo escuchar Ctrl+C: {}", e);
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
                warn!("⚠️ No se pudo escuchar SIGTERM: {}", e);
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
