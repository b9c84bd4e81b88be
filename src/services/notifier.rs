use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when dispatching notifications
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Dispatcher returned error: {0}")]
    ApiError(String),
}

/// Notification events emitted by the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyEvent {
    NewRequest,
    ApprovalResult,
    MatchFound,
}

/// Recipient selector, resolved to concrete users by the dispatcher
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipient {
    Administrators,
    Requester { request_id: i64 },
}

/// Envelope posted to the notification dispatcher
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotifyEnvelope<'a> {
    event_id: String,
    event: NotifyEvent,
    recipient: &'a Recipient,
    payload: &'a Value,
}

/// Client for the external notification dispatcher
///
/// The dispatcher owns delivery (fan-out, email, read state); this client
/// only hands events over. Callers treat dispatch as fire-and-forget: a
/// failed dispatch is logged by the workflow and never fails the
/// surrounding transition.
pub struct Notifier {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl Notifier {
    pub fn new(endpoint: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            client,
        }
    }

    /// Dispatch one notification event
    pub async fn dispatch(
        &self,
        event: NotifyEvent,
        recipient: Recipient,
        payload: Value,
    ) -> Result<(), NotifyError> {
        let envelope = NotifyEnvelope {
            event_id: uuid::Uuid::new_v4().to_string(),
            event,
            recipient: &recipient,
            payload: &payload,
        };

        let mut request = self.client.post(&self.endpoint).json(&envelope);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::ApiError(format!(
                "dispatch returned {}",
                response.status()
            )));
        }

        tracing::debug!("Dispatched {:?} notification to {:?}", event, recipient);

        Ok(())
    }
}
