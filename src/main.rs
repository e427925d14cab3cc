use attendance_api::{AppConfig, AppState, migration::Migrator, router};
use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    let state = AppState::new(db, config.query_config());
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Attendance API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
