//! Bridge module — the chat client as the engine's [`Enricher`].
//!
//! The engine is synchronous; the client is async. The bridge owns a small
//! current-thread runtime and blocks on each call, so it must not be used
//! from inside another tokio runtime.

use std::sync::Arc;

use lifesim_core::Enricher;
use lifesim_llm::ChatClient;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Blocking [`Enricher`] over a shared [`ChatClient`].
#[derive(Debug, Clone)]
pub struct LlmEnricher {
    client: Arc<ChatClient>,
    runtime: Arc<Runtime>,
}

impl LlmEnricher {
    /// Wrap `client` with its own runtime.
    ///
    /// # Errors
    ///
    /// Fails when the runtime cannot be built.
    pub fn new(client: Arc<ChatClient>) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self::with_runtime(client, Arc::new(runtime)))
    }

    /// Wrap `client`, sharing an existing runtime.
    #[must_use]
    pub fn with_runtime(client: Arc<ChatClient>, runtime: Arc<Runtime>) -> Self {
        Self { client, runtime }
    }

    /// The wrapped client.
    #[must_use]
    pub fn client(&self) -> &Arc<ChatClient> {
        &self.client
    }

    /// Run the client's connectivity check.
    #[must_use]
    pub fn ping(&self) -> String {
        self.runtime.block_on(self.client.ping())
    }
}

impl Enricher for LlmEnricher {
    fn is_available(&self) -> bool {
        self.client.is_available()
    }

    fn enrich(&self, system: &str, prompt: &str) -> String {
        debug!(model = %self.client.model(), prompt_chars = prompt.chars().count(), "Enriching reply");
        self.runtime.block_on(self.client.chat_text(system, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifesim_llm::ClientSettings;

    #[test]
    fn keyless_client_reports_unavailable_and_diagnoses() {
        let client = Arc::new(ChatClient::new(ClientSettings::default()));
        let enricher = LlmEnricher::new(client).expect("runtime");
        assert!(!enricher.is_available());
        assert!(enricher.enrich("sys", "prompt").starts_with("[LLM]"));
        assert!(enricher.ping().starts_with("[LLM]"));
    }
}
