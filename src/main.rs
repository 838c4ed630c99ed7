use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use car_manager::config::environment::{EnvironmentConfig, StoreBackend};
use car_manager::database::DatabaseConnection;
use car_manager::store::{DocumentStore, MemoryStore, PgDocumentStore};
use car_manager::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚗 Car Manager API");
    info!("==================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar store de documentos
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Memory => {
            warn!("🧠 Usando store en memoria: los datos se pierden al reiniciar");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let db_connection = match DatabaseConnection::new_default().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            let pg_store = PgDocumentStore::new(db_connection.pool().clone());
            pg_store.spawn_change_listener().await?;
            Arc::new(pg_store)
        }
    };

    let app_state = AppState::new(store, config.clone());
    let app = create_router(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Estado del servicio");
    info!("🔐 Sesión:");
    info!("   POST   /api/auth/session - Iniciar sesión");
    info!("   DELETE /api/auth/session - Cerrar sesión");
    info!("🚗 Vehículos:");
    info!("   GET    /api/vehicle - Listar vehículos");
    info!("   POST   /api/vehicle - Crear vehículo");
    info!("   GET    /api/vehicle/:id - Obtener vehículo");
    info!("   PUT    /api/vehicle/:id - Actualizar vehículo");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo y sus registros");
    info!("⛽ Combustible:");
    info!("   GET    /api/fuel?vehicle_id= - Listar repostajes");
    info!("   POST   /api/fuel - Añadir repostaje");
    info!("   PUT    /api/fuel/:id - Editar repostaje");
    info!("   DELETE /api/fuel/:id - Eliminar repostaje");
    info!("🔧 Mantenimiento:");
    info!("   GET    /api/maintenance?vehicle_id=&view= - Listar mantenimientos");
    info!("   POST   /api/maintenance - Añadir mantenimiento");
    info!("   PUT    /api/maintenance/:id - Editar mantenimiento");
    info!("   DELETE /api/maintenance/:id - Eliminar mantenimiento");
    info!("🔔 Notificaciones:");
    info!("   GET    /api/notifications?vehicle_id= - Avisos de vencimiento");
    info!("   GET    /api/notifications/stream - Avisos en vivo (SSE)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
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
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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
