use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{error, info, trace};

use super::serve::serve;
use crate::config::AppConfig;

/// Applies pending migrations and then starts the web server. This is
/// the deployment entry point: a fresh database comes up ready without
/// a separate init step.
pub async fn migrate_and_serve(config: AppConfig) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations before serving");

    let db = match Database::connect(&config.database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", config.database_url, e);
            return Err(e.into());
        }
    };

    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Database migrations completed successfully");
        }
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }
    drop(db);

    serve(config).await
}
