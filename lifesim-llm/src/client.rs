//! Chat client for OpenAI-compatible `/chat/completions` endpoints.

use std::time::Duration;

use lifesim_core::types::truncate_chars;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::prompt::{
    AUTH_FAILED, BODY_EXCERPT_CHARS, DIAGNOSTIC_MAX_CHARS, DIAGNOSTIC_PREFIX, LAST_ERROR_MAX_CHARS, PING_MAX_TOKENS,
    PING_SYSTEM, PING_USER, exhausted_message, missing_key_message, model_hint,
};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ClientSettings, LlmStatus};

const FALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// A chat-completion client with a model registry and bounded retries.
///
/// The active model sits behind a lock so a shared client can switch models
/// without `&mut`.
pub struct ChatClient {
    http: Client,
    settings: ClientSettings,
    models: Vec<String>,
    model: RwLock<String>,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.settings.base_url)
            .field("has_key", &self.is_available())
            .field("model", &*self.model.read())
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create a client. The configured model is registered if it is not
    /// already in the model list.
    #[must_use]
    pub fn new(settings: ClientSettings) -> Self {
        let mut models = settings.models.clone();
        if !models.contains(&settings.model) {
            models.push(settings.model.clone());
        }
        Self {
            http: Client::new(),
            model: RwLock::new(settings.model.clone()),
            models,
            settings,
        }
    }

    /// Whether a credential is configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.settings.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Currently active model.
    #[must_use]
    pub fn model(&self) -> String {
        self.model.read().clone()
    }

    /// Switch the active model. Returns `false` (and changes nothing) for an
    /// unregistered model.
    pub fn set_model(&self, model: &str) -> bool {
        if !self.models.iter().any(|m| m == model) {
            debug!(model, "Refusing unregistered model");
            return false;
        }
        *self.model.write() = model.to_string();
        info!(model, "Active model changed");
        true
    }

    /// Registered models.
    #[must_use]
    pub fn list_models(&self) -> &[String] {
        &self.models
    }

    /// Registered models with their hints.
    #[must_use]
    pub fn model_hints(&self) -> Vec<(String, &'static str)> {
        self.models.iter().map(|m| (m.clone(), model_hint(m))).collect()
    }

    /// Configuration snapshot.
    #[must_use]
    pub fn status(&self) -> LlmStatus {
        LlmStatus {
            has_key: self.is_available(),
            active_model: self.model(),
            available_models: self.models.clone(),
            timeout_secs: self.settings.timeout_secs,
            retries: self.settings.max_retries,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.settings.timeout_secs).unwrap_or(FALLBACK_TIMEOUT)
    }

    /// Send one system + user exchange and return the generated text, cut to
    /// `max_tokens` characters.
    ///
    /// Makes up to `max_retries + 1` attempts. A 401 is returned immediately
    /// as [`LlmError::Unauthorized`].
    pub async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError> {
        let Some(api_key) = self.settings.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Err(LlmError::Unavailable(format!("{} nicht gesetzt", self.settings.api_key_env)));
        };

        let model = self.model();
        let body = ChatRequest {
            model: model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens,
            temperature: self.settings.temperature,
        };
        let timeout = self.timeout();
        let attempts = self.settings.max_retries.saturating_add(1);

        let mut last_error = String::new();
        for attempt in 0..attempts {
            if attempt > 0 {
                debug!("Retrying chat call (attempt {}/{})", attempt + 1, attempts);
            }

            let result = self
                .http
                .post(&self.settings.base_url)
                .bearer_auth(api_key)
                .json(&body)
                .timeout(timeout)
                .send()
                .await;

            match result {
                Ok(resp) if resp.status() == StatusCode::UNAUTHORIZED => {
                    warn!(model = %model, "Chat endpoint rejected the API key");
                    return Err(LlmError::Unauthorized);
                }
                Ok(resp) if resp.status().is_success() => {
                    let parsed: ChatResponse = resp
                        .json()
                        .await
                        .map_err(|e| LlmError::ParseError(e.to_string()))?;
                    let text = truncate_chars(parsed.first_content(), max_tokens as usize);
                    debug!(model = %model, attempt = attempt + 1, chars = text.chars().count(), "Chat call succeeded");
                    return Ok(text);
                }
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let excerpt = resp.text().await.unwrap_or_default();
                    last_error = format!("HTTP {status}: {}", truncate_chars(&excerpt, BODY_EXCERPT_CHARS));
                    warn!("Chat endpoint returned error: {}", last_error);
                }
                Err(e) if e.is_timeout() => {
                    last_error = "Timeout".to_string();
                    warn!("Chat request timed out after {}ms", timeout.as_millis());
                }
                Err(e) => {
                    last_error = truncate_chars(&e.to_string(), LAST_ERROR_MAX_CHARS);
                    warn!("Chat request failed: {}", last_error);
                }
            }
        }

        Err(LlmError::RetriesExhausted { attempts, last_error })
    }

    /// Like [`chat`](Self::chat) with the configured budget, but never fails:
    /// errors become short `[LLM] …` diagnostic strings.
    pub async fn chat_text(&self, system: &str, user: &str) -> String {
        self.chat_text_with(system, user, self.settings.max_tokens).await
    }

    async fn chat_text_with(&self, system: &str, user: &str, max_tokens: u32) -> String {
        match self.chat(system, user, max_tokens).await {
            Ok(text) => text,
            Err(LlmError::Unauthorized) => AUTH_FAILED.to_string(),
            Err(LlmError::Unavailable(_)) => missing_key_message(&self.settings.api_key_env),
            Err(LlmError::RetriesExhausted { attempts, last_error }) => exhausted_message(attempts, &last_error),
            Err(other) => truncate_chars(&format!("{DIAGNOSTIC_PREFIX} {other}"), DIAGNOSTIC_MAX_CHARS),
        }
    }

    /// Connectivity check: asks for a one-word answer.
    pub async fn ping(&self) -> String {
        if !self.is_available() {
            return missing_key_message(&self.settings.api_key_env);
        }
        self.chat_text_with(PING_SYSTEM, PING_USER, PING_MAX_TOKENS).await
    }
}
