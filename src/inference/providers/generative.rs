//! Generative backend — the fallback when no webhook is configured or the
//! webhook fails.
//!
//! One prompt embedding the user message and the serialized snapshot goes
//! to a `generateContent` endpoint. The generated text is located at
//! `candidates[0].content.parts[0].text`, stripped of code fences, and
//! parsed as an [`InferenceResult`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inference::{InferenceResult, ProviderError};
use crate::profile::ProfileState;

// ── Wire shapes ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

// ── Provider ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GenerativeProvider {
    api_base_url: String,
    /// API key, env-sourced. `None` fails fast at call time so the router
    /// can degrade without a doomed network round-trip.
    credential: Option<String>,
    client: reqwest::Client,
}

impl GenerativeProvider {
    pub fn new(
        api_base_url: String,
        credential: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Transport(format!("http client build failed: {e}")))?;
        Ok(Self {
            api_base_url,
            credential,
            client,
        })
    }

    pub async fn infer(
        &self,
        message: &str,
        snapshot: &ProfileState,
    ) -> Result<InferenceResult, ProviderError> {
        let key = self
            .credential
            .as_deref()
            .ok_or_else(|| ProviderError::Transport("no credential configured".to_string()))?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: build_prompt(message, snapshot)?,
                }],
            }],
        };

        let response = self
            .client
            .post(format!("{}?key={key}", self.api_base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("generative endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "generative endpoint returned {status}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Shape(format!("generative body: {e}")))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ProviderError::Shape("response has no candidate text".to_string()))?;

        debug!(chars = text.len(), "generative text received");
        extract_result(text)
    }
}

/// Prompt instructing the model to answer with exactly the result shape.
fn build_prompt(message: &str, snapshot: &ProfileState) -> Result<String, ProviderError> {
    let dna = serde_json::to_string(snapshot)
        .map_err(|e| ProviderError::Shape(format!("snapshot serialize: {e}")))?;
    Ok(format!(
        "Analyze this business: {message}. DNA State: {dna}. \
         Output JSON: {{\"reply\": \"\", \"update\": {{}}}}"
    ))
}

/// Strip surrounding markdown code fences, then parse the embedded JSON.
fn extract_result(text: &str) -> Result<InferenceResult, ProviderError> {
    let candidate = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(candidate)
        .map_err(|e| ProviderError::Shape(format!("generated text is not a turn result: {e}")))
}
