use anyhow::Result;
use sea_orm::Database;

use crate::schemas::AppState;
use crate::webhook::WebhookNotifier;

/// Application configuration, built once at startup from CLI flags and
/// their environment fallbacks, then passed by reference wherever it is
/// needed. Nothing else in the application reads the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Automation endpoint for intake notifications; `None` disables
    /// the notifier.
    pub intake_webhook_url: Option<String>,
}

impl AppConfig {
    pub fn new(
        database_url: String,
        bind_address: String,
        intake_webhook_url: Option<String>,
    ) -> Self {
        Self {
            database_url,
            bind_address,
            intake_webhook_url,
        }
    }
}

/// Connect to the database and assemble the shared application state.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    let notifier = WebhookNotifier::new(config.intake_webhook_url.clone())?;

    Ok(AppState { db, notifier })
}
