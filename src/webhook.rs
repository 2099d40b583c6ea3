use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

/// The small subset of an intake submission forwarded to the automation
/// endpoint. Everything else stays in the database.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeNotification {
    pub ticket_id: i32,
    pub name: String,
    pub phone: String,
    pub agent_name: Option<String>,
    pub city: Option<String>,
    pub timestamp: String,
}

/// Best-effort notifier for newly created intake submissions.
///
/// This is the explicit "logged on failure" side of the error policy:
/// persistence must succeed or the request fails, while notification
/// failures are logged and swallowed — the submitter never sees them.
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl WebhookNotifier {
    pub fn new(endpoint: Option<String>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Fire-and-forget delivery on a spawned task. Returns immediately;
    /// never surfaces a failure to the caller.
    pub fn notify(&self, payload: IntakeNotification) {
        let Some(endpoint) = self.endpoint.clone() else {
            debug!("Intake webhook not configured, skipping notification");
            return;
        };
        let client = self.client.clone();

        tokio::spawn(async move {
            let ticket_id = payload.ticket_id;
            match client.post(&endpoint).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Intake notification for ticket {} delivered", ticket_id);
                }
                Ok(response) => {
                    warn!(
                        "Intake webhook rejected notification for ticket {}: {}",
                        ticket_id,
                        response.status()
                    );
                }
                Err(e) => {
                    warn!(
                        "Failed to deliver intake notification for ticket {}: {}",
                        ticket_id, e
                    );
                }
            }
        });
    }
}
