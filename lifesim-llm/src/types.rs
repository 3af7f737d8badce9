//! Wire types for chat completions and client settings.

use serde::{Deserialize, Serialize};

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Body of a `/chat/completions` POST.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model id.
    pub model: String,
    /// System then user message.
    pub messages: Vec<ChatMessage>,
    /// Generation budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// The subset of a chat-completion response the client reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions; only the first is used.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One completion candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    /// Generated message.
    #[serde(default)]
    pub message: ChoiceMessage,
}

/// The message inside a [`ChatChoice`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text.
    #[serde(default)]
    pub content: String,
}

impl ChatResponse {
    /// Text of the first choice, empty when there is none.
    #[must_use]
    pub fn first_content(&self) -> &str {
        self.choices.first().map_or("", |c| c.message.content.as_str())
    }
}

/// Everything the client needs, already resolved from config and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Full chat-completions endpoint URL.
    pub base_url: String,
    /// Bearer credential; `None` makes the client unavailable.
    pub api_key: Option<String>,
    /// Name of the variable the key came from, used in diagnostics.
    pub api_key_env: String,
    /// Initially active model.
    pub model: String,
    /// Registered models.
    pub models: Vec<String>,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: f64,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Generation budget and output character cap.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: None,
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            models: vec![
                "llama-3.1-8b-instant".to_string(),
                "llama-3.1-70b-versatile".to_string(),
                "mixtral-8x7b-32768".to_string(),
            ],
            timeout_secs: 30.0,
            max_retries: 2,
            max_tokens: 280,
            temperature: 0.4,
        }
    }
}

/// Snapshot of the client's configuration, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmStatus {
    /// Whether a credential is configured.
    pub has_key: bool,
    /// Currently active model.
    pub active_model: String,
    /// Registered models.
    pub available_models: Vec<String>,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: f64,
    /// Retries after the first attempt.
    pub retries: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialises_openai_shape() {
        let req = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            max_tokens: 5,
            temperature: 0.4,
        };
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["max_tokens"], 5);
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let empty: ChatResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(empty.first_content(), "");
        let partial: ChatResponse = serde_json::from_str(r#"{"choices":[{}]}"#).expect("parse");
        assert_eq!(partial.first_content(), "");
        let full: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"OK"}}],"usage":{}}"#)
                .expect("parse");
        assert_eq!(full.first_content(), "OK");
    }
}
