//! Inference backend implementations.
//!
//! `build_chain(config)` is the factory — called once at session start.
//! Adding a new backend = new module + new entry in the chain here.

pub mod generative;
pub mod scripted;
pub mod webhook;

use crate::config::RouterConfig;
use crate::inference::{InferenceProvider, ProviderError};

/// Construct the priority-ordered provider chain from config.
///
/// The webhook leads iff an endpoint is configured; the generative
/// fallback is always appended. The router tries entries in order, so
/// chain order *is* the routing policy.
pub fn build_chain(config: &RouterConfig) -> Result<Vec<InferenceProvider>, ProviderError> {
    let mut chain = Vec::new();

    if let Some(endpoint) = &config.primary_endpoint {
        let p = webhook::WebhookProvider::new(endpoint.clone(), config.primary_timeout_seconds)?;
        chain.push(InferenceProvider::Webhook(p));
    }

    let p = generative::GenerativeProvider::new(
        config.generative_api_base_url.clone(),
        config.credential.clone(),
        config.generative_timeout_seconds,
    )?;
    chain.push(InferenceProvider::Generative(p));

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(primary: Option<&str>) -> RouterConfig {
        RouterConfig {
            primary_endpoint: primary.map(str::to_string),
            primary_timeout_seconds: 1,
            generative_api_base_url: "http://localhost:0/generate".into(),
            generative_timeout_seconds: 1,
            credential: Some("test-key".into()),
        }
    }

    #[test]
    fn chain_without_primary_is_generative_only() {
        let chain = build_chain(&config(None)).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name(), "generative");
    }

    #[test]
    fn chain_with_primary_leads_with_webhook() {
        let chain = build_chain(&config(Some("http://localhost:0/webhook"))).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].name(), "webhook");
        assert_eq!(chain[1].name(), "generative");
    }
}
