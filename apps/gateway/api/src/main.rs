use axum_helpers::server::{close_postgres, create_production_app};
use core_config::tracing::{init_tracing, install_color_eyre};
use gateway_api::{api, app, config::Config, state::AppState};
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so start-up errors are reported in color
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);
    observability::init_metrics();

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    } else {
        info!("RUN_MIGRATIONS disabled, skipping migrations");
    }

    let state = AppState { config, db };

    let probes = api::probes(state.config.app).merge(api::ready_router(state.clone()));
    let router = app(api::routes(&state), probes, &state.config.server);

    info!(
        app = state.config.app.name,
        version = state.config.app.version,
        "Starting gateway"
    );

    let server = state.config.server.clone();
    create_production_app(router, &server, async move {
        info!("Shutting down: closing database connections");
        close_postgres(state.db, "gateway").await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Gateway shutdown complete");
    Ok(())
}
