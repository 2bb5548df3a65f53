//! Flood control API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use flood_control_application::{ConfigBackend, FloodSettingsService, PolicyConfigStore};
use flood_control_core::AppError;
use flood_control_infrastructure::{
    InMemoryConfigBackend, PostgresConfigBackend, StaticPermissionOracle,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, BackendConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let backend: Arc<dyn ConfigBackend> = match &config.backend {
        BackendConfig::Memory => {
            if config.migrate_only {
                info!("memory backend selected, no migrations to apply");
                return Ok(());
            }
            Arc::new(InMemoryConfigBackend::with_defaults())
        }
        BackendConfig::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .map_err(|error| {
                    AppError::Unavailable(format!("failed to connect to database: {error}"))
                })?;

            sqlx::migrate!("../../crates/infrastructure/migrations")
                .run(&pool)
                .await
                .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            let backend = PostgresConfigBackend::new(pool);
            backend.seed_defaults().await?;
            Arc::new(backend)
        }
    };

    let oracle = config
        .capability_grants
        .iter()
        .cloned()
        .collect::<StaticPermissionOracle>();
    let settings_service =
        FloodSettingsService::new(PolicyConfigStore::new(backend), Arc::new(oracle));

    let app_state = AppState {
        settings_service,
        operator_tokens: Arc::new(config.operator_tokens.clone()),
        backend_name: config.backend.name(),
    };

    let app = api_router::build_router(app_state, config.frontend_url.as_str())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, backend = config.backend.name(), "flood control API listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("API server failed: {error}")))
}
