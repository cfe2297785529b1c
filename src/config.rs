//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `HELIX_PRIMARY_URL` and `HELIX_LOG_LEVEL` env overrides.
//! The generative credential comes from `LLM_API_KEY` env only, never TOML.
//! Everything is read once at session start and stays constant for the
//! session's lifetime.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// Routing configuration consumed by the provider-chain factory.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Operator webhook URL. `None` means the primary is not in the chain
    /// and the generative fallback handles every turn.
    pub primary_endpoint: Option<String>,
    /// Per-request webhook timeout in seconds.
    pub primary_timeout_seconds: u64,
    /// Full `generateContent` endpoint URL for the fallback.
    pub generative_api_base_url: String,
    /// Per-request fallback timeout in seconds.
    pub generative_timeout_seconds: u64,
    /// API key from `LLM_API_KEY` env. `None` makes the fallback fail fast
    /// at call time; it is never sourced from TOML.
    pub credential: Option<String>,
}

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub log_level: String,
    pub router: RouterConfig,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    session: RawSession,
    #[serde(default)]
    router: RawRouter,
}

#[derive(Deserialize)]
struct RawSession {
    bot_name: String,
    log_level: String,
}

#[derive(Deserialize, Default)]
struct RawRouter {
    #[serde(default)]
    primary: RawPrimary,
    #[serde(default)]
    generative: RawGenerative,
}

#[derive(Deserialize)]
struct RawPrimary {
    /// Absent by default: the webhook must be explicitly configured.
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default = "default_primary_timeout_seconds")]
    timeout_seconds: u64,
}

#[derive(Deserialize)]
struct RawGenerative {
    #[serde(default = "default_generative_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_generative_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawPrimary {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: default_primary_timeout_seconds(),
        }
    }
}

impl Default for RawGenerative {
    fn default() -> Self {
        Self {
            api_base_url: default_generative_api_base_url(),
            timeout_seconds: default_generative_timeout_seconds(),
        }
    }
}

fn default_primary_timeout_seconds() -> u64 {
    30
}
fn default_generative_timeout_seconds() -> u64 {
    30
}
fn default_generative_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        .to_string()
}

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    // An empty HELIX_PRIMARY_URL means "no primary", same as unset.
    let primary_override = env::var("HELIX_PRIMARY_URL")
        .ok()
        .filter(|s| !s.is_empty());
    let log_level_override = env::var("HELIX_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        primary_override.as_deref(),
        log_level_override.as_deref(),
        env::var("LLM_API_KEY").ok(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    primary_override: Option<&str>,
    log_level_override: Option<&str>,
    credential: Option<String>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let log_level = log_level_override
        .unwrap_or(&parsed.session.log_level)
        .to_string();
    let primary_endpoint = primary_override
        .map(str::to_string)
        .or(parsed.router.primary.endpoint);

    Ok(Config {
        bot_name: parsed.session.bot_name,
        log_level,
        router: RouterConfig {
            primary_endpoint,
            primary_timeout_seconds: parsed.router.primary.timeout_seconds,
            generative_api_base_url: parsed.router.generative.api_base_url,
            generative_timeout_seconds: parsed.router.generative.timeout_seconds,
            credential,
        },
    })
}
