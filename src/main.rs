use std::net::SocketAddr;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use dealership_backend::config::EnvironmentConfig;
use dealership_backend::database::build_store;
use dealership_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚗 Dealership Backend - Inventario y Personal");
    info!("============================================");
    info!("🌍 Entorno: {} | almacén: {:?}", config.environment, config.store_backend);
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS permisivo en producción, define CORS_ORIGINS");
    }

    // Inicializar almacén de documentos
    let store = match build_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("❌ Error inicializando el almacén: {}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(config, store));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Health check");
    info!("🚗 Vehículos:");
    info!("   POST   /api/cars - Crear vehículo");
    info!("   GET    /api/cars?status=&manager=&limit= - Listar vehículos");
    info!("   GET    /api/cars/manager/:name - Vehículos de un manager");
    info!("   GET    /api/cars/:id - Obtener vehículo");
    info!("   PUT    /api/cars/:id - Actualizar vehículo");
    info!("   DELETE /api/cars/:id - Eliminar vehículo");
    info!("👤 Personal:");
    info!("   POST   /api/staff - Registrar miembro");
    info!("   GET    /api/staff?status=&limit= - Listar personal");
    info!("   GET    /api/staff/search?q= - Buscar personal");
    info!("   GET    /api/staff/:id - Obtener miembro");
    info!("   PUT    /api/staff/:id - Actualizar miembro");
    info!("   DELETE /api/staff/:id - Eliminar miembro");

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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
