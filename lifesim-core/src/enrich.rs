//! The optional text-enrichment collaborator.
//!
//! The engine never talks to a network itself. A host hands it an
//! [`Enricher`] (typically a chat-completion client) and the engine asks it to
//! rewrite the locally composed reply.

/// Prefix of in-band failure strings returned by an [`Enricher`].
pub const DIAGNOSTIC_PREFIX: &str = "[LLM]";

/// Rewrites a reply given a system instruction and a prompt.
///
/// Implementations must not fail: on any error they return a short
/// diagnostic string starting with [`DIAGNOSTIC_PREFIX`].
pub trait Enricher: Send + Sync {
    /// Whether the collaborator is configured at all (e.g. has a credential).
    fn is_available(&self) -> bool;

    /// Generated text, or a diagnostic string.
    fn enrich(&self, system: &str, prompt: &str) -> String;
}

/// Whether `text` is an in-band failure rather than generated text.
#[must_use]
pub fn is_diagnostic(text: &str) -> bool {
    text.starts_with(DIAGNOSTIC_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_are_recognised() {
        assert!(is_diagnostic("[LLM] Auth fehlgeschlagen (401). Prüfe GROQ_API_KEY."));
        assert!(!is_diagnostic("Hallo, lass uns kurz atmen."));
    }
}
