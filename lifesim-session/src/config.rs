//! Configuration loading with environment overrides.
//!
//! The TOML file is optional. After parsing, the `GROQ_*` variables override
//! the `[llm]` section, and the API key itself is only ever read from the
//! environment (the variable named by `llm.api_key_env`).

use std::path::Path;

use lifesim_core::config::LlmConfig;
use lifesim_core::{LifesimConfig, Result};
use lifesim_llm::ClientSettings;
use tracing::{debug, warn};

/// Overrides the chat endpoint URL.
pub const ENV_BASE_URL: &str = "GROQ_BASE_URL";
/// Overrides the active model.
pub const ENV_MODEL: &str = "GROQ_MODEL";
/// Comma-separated model registry.
pub const ENV_MODELS: &str = "GROQ_MODELS";
/// Per-attempt timeout in seconds.
pub const ENV_TIMEOUT: &str = "GROQ_TIMEOUT";
/// Retries after the first attempt.
pub const ENV_RETRIES: &str = "GROQ_RETRIES";

/// Load `path` if it exists, defaults otherwise, then apply the process
/// environment.
///
/// # Errors
///
/// Returns `LifesimError::Config` for an unreadable or invalid file.
pub fn load_config(path: Option<&Path>) -> Result<LifesimConfig> {
    let mut config = match path {
        Some(p) if p.exists() => LifesimConfig::from_file(p)?,
        Some(p) => {
            debug!(path = %p.display(), "No config file, using defaults");
            LifesimConfig::default()
        }
        None => LifesimConfig::default(),
    };
    apply_env_overrides(&mut config.llm, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply `GROQ_*` overrides read through `lookup`. Unparsable numbers are
/// logged and ignored.
pub fn apply_env_overrides<F>(llm: &mut LlmConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_BASE_URL) {
        llm.base_url = url;
    }
    if let Some(raw) = get(ENV_MODELS) {
        let models: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        if !models.is_empty() {
            llm.models = models;
        }
    }
    if let Some(model) = get(ENV_MODEL) {
        llm.model = model;
    }
    if let Some(raw) = get(ENV_TIMEOUT) {
        match raw.parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs > 0.0 => llm.timeout_secs = secs,
            _ => warn!(value = %raw, "Ignoring invalid {ENV_TIMEOUT}"),
        }
    }
    if let Some(raw) = get(ENV_RETRIES) {
        match raw.parse::<u32>() {
            Ok(retries) => llm.max_retries = retries,
            Err(_) => warn!(value = %raw, "Ignoring invalid {ENV_RETRIES}"),
        }
    }
}

/// Resolve client settings, reading the API key through `lookup`.
#[must_use]
pub fn client_settings<F>(llm: &LlmConfig, lookup: F) -> ClientSettings
where
    F: Fn(&str) -> Option<String>,
{
    ClientSettings {
        base_url: llm.base_url.clone(),
        api_key: lookup(&llm.api_key_env).filter(|k| !k.trim().is_empty()),
        api_key_env: llm.api_key_env.clone(),
        model: llm.model.clone(),
        models: llm.models.clone(),
        timeout_secs: llm.timeout_secs,
        max_retries: llm.max_retries,
        max_tokens: llm.max_tokens,
        temperature: llm.temperature,
    }
}
