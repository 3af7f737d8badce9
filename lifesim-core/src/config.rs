//! Configuration for the life-simulation engine.
//!
//! Maps directly to `lifesim.toml`. Every field has a serde default, so an
//! empty file (or no file at all) yields [`LifesimConfig::default`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifesimConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Persona turn behaviour.
    #[serde(default)]
    pub persona: PersonaConfig,
    /// Memory retrieval heuristic.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Overmind controller bounds.
    #[serde(default)]
    pub overmind: OvermindConfig,
    /// Remote enrichment settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Collaborator file locations.
    #[serde(default)]
    pub paths: PathsConfig,
}

impl LifesimConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `LifesimError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::LifesimError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Persona name used for a freshly created state.
    #[serde(default = "default_persona_name")]
    pub persona_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            persona_name: "Ari".to_string(),
        }
    }
}

/// Per-turn persona behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Episode log cap enforced at epoch compression.
    #[serde(default = "default_200")]
    pub max_episode_history: usize,
    /// Episodes retrieved as reply context.
    #[serde(default = "default_3_usize")]
    pub retrieval_k: usize,
    /// A reflection note is written every N turns.
    #[serde(default = "default_5_u64")]
    pub reflection_every: u64,
    /// Enriched replies are cut to this many characters.
    #[serde(default = "default_320")]
    pub reply_max_chars: usize,
    /// Ticker thoughts are cut to this many characters.
    #[serde(default = "default_160")]
    pub thought_max_len: usize,
    /// Automatic epoch every N days (0 disables).
    #[serde(default = "default_7")]
    pub epoch_every_days: u32,
    /// Whether the web-research action may be offered.
    #[serde(default)]
    pub web_research: bool,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            max_episode_history: 200,
            retrieval_k: 3,
            reflection_every: 5,
            reply_max_chars: 320,
            thought_max_len: 160,
            epoch_every_days: 7,
            web_research: false,
        }
    }
}

/// Lexical memory retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Only the most recent N episodes are scored.
    #[serde(default = "default_100")]
    pub window: usize,
    /// Query tokens shorter than this are discarded.
    #[serde(default = "default_3_usize")]
    pub min_token_len: usize,
    /// Scoring weights.
    #[serde(default)]
    pub weights: RetrievalWeights,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            window: 100,
            min_token_len: 3,
            weights: RetrievalWeights::default(),
        }
    }
}

/// Retrieval scoring weights. They intentionally do not sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalWeights {
    /// Weight for the lexical overlap ratio.
    #[serde(default = "default_0_7")]
    pub lexical: f64,
    /// Weight for stored importance.
    #[serde(default = "default_0_3")]
    pub importance: f64,
    /// Weight for recency.
    #[serde(default = "default_0_2")]
    pub recency: f64,
}

impl Default for RetrievalWeights {
    fn default() -> Self {
        Self {
            lexical: 0.7,
            importance: 0.3,
            recency: 0.2,
        }
    }
}

/// Overmind ticker bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvermindConfig {
    /// Ticker interval of a fresh state.
    #[serde(default = "default_6000")]
    pub initial_interval_ms: u64,
    /// Floor applied when clarity is low.
    #[serde(default = "default_4000")]
    pub min_interval_ms: u64,
    /// Cap applied when clarity is fine.
    #[serde(default = "default_8000")]
    pub max_interval_ms: u64,
    /// Interval decrease per low-clarity turn.
    #[serde(default = "default_500")]
    pub step_down_ms: u64,
    /// Interval increase per turn otherwise.
    #[serde(default = "default_250")]
    pub step_up_ms: u64,
}

impl Default for OvermindConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 6000,
            min_interval_ms: 4000,
            max_interval_ms: 8000,
            step_down_ms: 500,
            step_up_ms: 250,
        }
    }
}

/// Remote chat-completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Full chat-completions endpoint URL.
    #[serde(default = "default_llm_url")]
    pub base_url: String,
    /// Active model.
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Models that `set_model` accepts.
    #[serde(default = "default_llm_models")]
    pub models: Vec<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// Retries after the first attempt (auth failures are never retried).
    #[serde(default = "default_2")]
    pub max_retries: u32,
    /// Generation budget; the reply is also cut to this many characters.
    #[serde(default = "default_280")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_url(),
            model: default_llm_model(),
            models: default_llm_models(),
            api_key_env: default_api_key_env(),
            timeout_secs: 30.0,
            max_retries: 2,
            max_tokens: 280,
            temperature: 0.4,
        }
    }
}

/// Collaborator file locations, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Persona state snapshot.
    #[serde(default = "default_state_path")]
    pub state: PathBuf,
    /// Action catalog JSON.
    #[serde(default = "default_actions_path")]
    pub actions: PathBuf,
    /// Event catalog JSON.
    #[serde(default = "default_events_path")]
    pub events: PathBuf,
    /// Directory of `<name>.json` scenarios.
    #[serde(default = "default_scenario_dir")]
    pub scenarios: PathBuf,
    /// Directory of item packs.
    #[serde(default = "default_item_dir")]
    pub items: PathBuf,
    /// Directory of skill cards.
    #[serde(default = "default_skill_dir")]
    pub skills: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
            actions: default_actions_path(),
            events: default_events_path(),
            scenarios: default_scenario_dir(),
            items: default_item_dir(),
            skills: default_skill_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_persona_name() -> String { "Ari".to_string() }
fn default_llm_url() -> String { "https://api.groq.com/openai/v1/chat/completions".to_string() }
fn default_llm_model() -> String { "llama-3.1-8b-instant".to_string() }
fn default_llm_models() -> Vec<String> {
    vec![
        "llama-3.1-8b-instant".to_string(),
        "llama-3.1-70b-versatile".to_string(),
        "mixtral-8x7b-32768".to_string(),
    ]
}
fn default_api_key_env() -> String { "GROQ_API_KEY".to_string() }
fn default_state_path() -> PathBuf { PathBuf::from("state.json") }
fn default_actions_path() -> PathBuf { PathBuf::from("actions/catalog.json") }
fn default_events_path() -> PathBuf { PathBuf::from("events/catalog.json") }
fn default_scenario_dir() -> PathBuf { PathBuf::from("scenarios") }
fn default_item_dir() -> PathBuf { PathBuf::from("items") }
fn default_skill_dir() -> PathBuf { PathBuf::from("skills") }
fn default_0_2() -> f64 { 0.2 }
fn default_0_3() -> f64 { 0.3 }
fn default_0_7() -> f64 { 0.7 }
fn default_timeout_secs() -> f64 { 30.0 }
fn default_temperature() -> f32 { 0.4 }
fn default_2() -> u32 { 2 }
fn default_7() -> u32 { 7 }
fn default_280() -> u32 { 280 }
fn default_3_usize() -> usize { 3 }
fn default_5_u64() -> u64 { 5 }
fn default_100() -> usize { 100 }
fn default_160() -> usize { 160 }
fn default_200() -> usize { 200 }
fn default_320() -> usize { 320 }
fn default_250() -> u64 { 250 }
fn default_500() -> u64 { 500 }
fn default_4000() -> u64 { 4000 }
fn default_6000() -> u64 { 6000 }
fn default_8000() -> u64 { 8000 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = LifesimConfig::from_toml("").expect("parse");
        assert_eq!(cfg.persona.max_episode_history, 200);
        assert_eq!(cfg.retrieval.window, 100);
        assert_eq!(cfg.overmind.min_interval_ms, 4000);
        assert_eq!(cfg.llm.max_retries, 2);
        assert!(!cfg.persona.web_research);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = LifesimConfig::from_toml(
            "[persona]\nmax_episode_history = 10\n[llm]\ntimeout_secs = 5.5\n",
        )
        .expect("parse");
        assert_eq!(cfg.persona.max_episode_history, 10);
        assert_eq!(cfg.persona.retrieval_k, 3);
        assert!((cfg.llm.timeout_secs - 5.5).abs() < f64::EPSILON);
        assert_eq!(cfg.llm.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = LifesimConfig::from_toml("[persona\n").expect_err("must fail");
        assert!(matches!(err, crate::LifesimError::Config(_)));
    }
}
