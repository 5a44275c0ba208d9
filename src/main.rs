mod api;
mod config;
mod database;
mod middleware;
mod models;
mod repositories;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::cors::cors_middleware_with_origins;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("FleetFlow - gestión de flotas a gran escala");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };

    database::run_migrations(&pool).await?;
    database::seed::ensure_admin_user(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Error creando el usuario admin: {}", e))?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let cors = cors_middleware_with_origins(&config.cors_origins);
    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/", get(health_endpoint))
        .merge(api::create_api_router(app_state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    info!("Servidor iniciando en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Servidor terminado");
    Ok(())
}

/// Endpoint de salud
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-management",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("Señal de terminación recibida, apagando servidor...");
        },
    }
}
