//! Inference backend abstraction.
//!
//! `InferenceProvider` is an enum over concrete backend implementations.
//! Add a new variant + module in `providers/` for each additional backend;
//! the router walks a priority list and needs no change.
//!
//! Provider instances are shared immutable capabilities — clone them
//! freely. `infer` is `async fn` on the enum so callers need no
//! trait-object machinery.

pub mod providers;
pub mod router;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::ProfileState;

// ── Contract ─────────────────────────────────────────────────────────────────

/// What every backend returns for one turn: a user-facing reply plus a
/// partial DNA update.
///
/// `update` is any subset of the known field names, possibly empty. An
/// absent key means "no new information this turn", never "clear this
/// field"; providers and the degraded result share this reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub reply: String,
    #[serde(default)]
    pub update: BTreeMap<String, String>,
}

impl InferenceResult {
    /// Reply-only result with an empty update.
    pub fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            update: BTreeMap::new(),
        }
    }
}

// ── Error ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Endpoint unreachable or replied with a non-success status.
    #[error("transport error: {0}")]
    Transport(String),
    /// Response arrived but could not be read as an [`InferenceResult`].
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

// ── Provider enum ────────────────────────────────────────────────────────────

/// All available inference backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait`
/// dependency. Adding a backend = new module + new variant + new `infer`
/// arm.
#[derive(Debug, Clone)]
pub enum InferenceProvider {
    /// Operator-configured webhook, tried first when configured.
    Webhook(providers::webhook::WebhookProvider),
    /// Generative text-completion fallback.
    Generative(providers::generative::GenerativeProvider),
    /// Canned in-process backend for tests and offline smoke runs.
    Scripted(providers::scripted::ScriptedProvider),
}

impl InferenceProvider {
    /// Run one turn against this backend: the user `message` plus the
    /// current profile `snapshot` go out, a reply + partial update comes
    /// back. No local state is touched; all effects are network calls.
    pub async fn infer(
        &self,
        message: &str,
        snapshot: &ProfileState,
    ) -> Result<InferenceResult, ProviderError> {
        match self {
            InferenceProvider::Webhook(p) => p.infer(message, snapshot).await,
            InferenceProvider::Generative(p) => p.infer(message, snapshot).await,
            InferenceProvider::Scripted(p) => p.infer(message, snapshot).await,
        }
    }

    /// Short backend name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            InferenceProvider::Webhook(_) => "webhook",
            InferenceProvider::Generative(_) => "generative",
            InferenceProvider::Scripted(_) => "scripted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_parses_with_missing_update() {
        let r: InferenceResult = serde_json::from_str(r#"{"reply":"ok"}"#).unwrap();
        assert_eq!(r.reply, "ok");
        assert!(r.update.is_empty());
    }

    #[test]
    fn result_rejects_non_string_update_values() {
        let parsed =
            serde_json::from_str::<InferenceResult>(r#"{"reply":"ok","update":{"niche":7}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn error_display() {
        let t = ProviderError::Transport("connect refused".into());
        assert!(t.to_string().contains("connect refused"));
        let s = ProviderError::Shape("missing reply".into());
        assert!(s.to_string().contains("missing reply"));
    }
}
