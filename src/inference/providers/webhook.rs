//! Webhook backend — posts the turn to the operator-configured endpoint.
//!
//! The far end owns the intelligence; this adapter only moves JSON.
//! Success requires the transport to complete, a 2xx status, and a body
//! already shaped as [`InferenceResult`]. No repair is attempted.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::inference::{InferenceResult, ProviderError};
use crate::profile::ProfileState;

/// Request body: the user message plus the full profile snapshot.
#[derive(Serialize)]
struct TurnPayload<'a> {
    message: &'a str,
    session_id: &'a str,
    dna_snapshot: &'a ProfileState,
}

#[derive(Debug, Clone)]
pub struct WebhookProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl WebhookProvider {
    /// The transport timeout lives here, not in the router.
    pub fn new(endpoint: String, timeout_seconds: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Transport(format!("http client build failed: {e}")))?;
        Ok(Self { endpoint, client })
    }

    pub async fn infer(
        &self,
        message: &str,
        snapshot: &ProfileState,
    ) -> Result<InferenceResult, ProviderError> {
        let payload = TurnPayload {
            message,
            session_id: &snapshot.session_id,
            dna_snapshot: snapshot,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("webhook unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!("webhook returned {status}")));
        }
        debug!(%status, "webhook responded");

        response
            .json::<InferenceResult>()
            .await
            .map_err(|e| ProviderError::Shape(format!("webhook body: {e}")))
    }
}
