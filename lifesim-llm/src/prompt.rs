//! Fixed prompts and in-band diagnostic texts.
//!
//! Persona prompts are composed by the engine from live state; this module
//! only holds the client's own texts.

use lifesim_core::types::truncate_chars;

/// System message of the connectivity check.
pub const PING_SYSTEM: &str = "System: ping";

/// User message of the connectivity check.
pub const PING_USER: &str = "Sag OK in einem Wort.";

/// Generation budget of the connectivity check.
pub const PING_MAX_TOKENS: u32 = 5;

/// Prefix shared by every diagnostic string.
pub const DIAGNOSTIC_PREFIX: &str = "[LLM]";

/// Returned by `chat_text` when the endpoint answers 401.
pub const AUTH_FAILED: &str = "[LLM] Auth fehlgeschlagen (401). Prüfe GROQ_API_KEY.";

/// Diagnostic strings never exceed this many characters.
pub const DIAGNOSTIC_MAX_CHARS: usize = 200;

/// Raw failure descriptions kept per attempt.
pub const LAST_ERROR_MAX_CHARS: usize = 140;

/// Response body excerpt kept for HTTP errors.
pub const BODY_EXCERPT_CHARS: usize = 100;

/// One-line descriptions of the stock models.
pub const MODEL_HINTS: &[(&str, &str)] = &[
    ("llama-3.1-8b-instant", "Schnell, günstig, gut für kurze Antworten (Standard)."),
    ("llama-3.1-70b-versatile", "Größer, bessere Kohärenz & Nuancen, etwas langsamer."),
    ("mixtral-8x7b-32768", "Mixture-of-Experts, längerer Kontext, balanced speed."),
];

/// Hint for `model`, or a placeholder for unknown ones.
#[must_use]
pub fn model_hint(model: &str) -> &'static str {
    MODEL_HINTS
        .iter()
        .find(|(name, _)| *name == model)
        .map_or("(kein Hinweis)", |(_, hint)| hint)
}

/// Diagnostic for a request that failed on every attempt.
#[must_use]
pub fn exhausted_message(attempts: u32, last_error: &str) -> String {
    truncate_chars(
        &format!("{DIAGNOSTIC_PREFIX} Fehlgeschlagen nach {attempts} Versuchen: {last_error}"),
        DIAGNOSTIC_MAX_CHARS,
    )
}

/// Diagnostic for a missing credential.
#[must_use]
pub fn missing_key_message(env: &str) -> String {
    format!("{DIAGNOSTIC_PREFIX} Kein {env} gesetzt.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_is_capped() {
        let long = "x".repeat(500);
        let msg = exhausted_message(3, &long);
        assert!(msg.starts_with("[LLM] Fehlgeschlagen nach 3 Versuchen: "));
        assert_eq!(msg.chars().count(), DIAGNOSTIC_MAX_CHARS);
    }

    #[test]
    fn hints_cover_stock_models() {
        assert!(model_hint("llama-3.1-8b-instant").contains("Standard"));
        assert_eq!(model_hint("unbekannt"), "(kein Hinweis)");
    }
}
