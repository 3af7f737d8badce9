//! Session — one persona, one state file, one optional chat client.
//!
//! A [`Session`] is single-threaded. Hosts that serve several callers wrap it
//! in a [`SharedSession`], where every operation holds the lock for its whole
//! duration so turns never interleave.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lifesim_core::catalogs::{Catalogs, load_items, load_scenario};
use lifesim_core::persistence::{load_state, save_state};
use lifesim_core::{
    ActionOutcome, Enricher, IdleReport, LifeSimEngine, LifesimConfig, LifesimError, PersonaReply, PersonaState,
};
use lifesim_llm::{ChatClient, LlmError, LlmStatus};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bridge::LlmEnricher;
use crate::config::client_settings;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// State, config or persistence failure.
    #[error(transparent)]
    Core(#[from] LifesimError),

    /// Chat client failure or misuse.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The async runtime for the chat client could not start.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A hosted persona.
pub struct Session {
    engine: LifeSimEngine,
    state_path: PathBuf,
    llm: Option<LlmEnricher>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state_path", &self.state_path)
            .field("llm", &self.llm.as_ref().map(|l| l.client().model()))
            .field("turn", &self.engine.state().turn)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open the persona at `config.paths.state`, with a chat client built
    /// from `config.llm` and the process environment.
    ///
    /// A missing state file starts a new persona.
    ///
    /// # Errors
    ///
    /// Fails on a malformed state file ([`LifesimError::Snapshot`]), an I/O
    /// error, or when the runtime cannot start.
    pub fn open(config: LifesimConfig) -> Result<Self> {
        let client = ChatClient::new(client_settings(&config.llm, |k| std::env::var(k).ok()));
        let llm = LlmEnricher::new(Arc::new(client)).map_err(SessionError::Runtime)?;
        Self::open_with(config, Some(llm))
    }

    /// Like [`open`](Self::open), but with an explicit (or no) enricher.
    ///
    /// # Errors
    ///
    /// Fails on a malformed or unreadable state file.
    pub fn open_with(config: LifesimConfig, llm: Option<LlmEnricher>) -> Result<Self> {
        let state = match load_state(&config.paths.state)? {
            Some(state) => {
                info!(path = %config.paths.state.display(), turn = state.turn, "Resumed persona");
                state
            }
            None => {
                info!(path = %config.paths.state.display(), "Starting new persona");
                PersonaState::new(&config)
            }
        };
        Ok(Self::assemble(config, state, llm))
    }

    /// Open the persona, starting fresh if the state file is malformed.
    ///
    /// The malformed file is left in place until the next [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or when the runtime cannot start.
    pub fn open_or_fresh(config: LifesimConfig) -> Result<Self> {
        let client = ChatClient::new(client_settings(&config.llm, |k| std::env::var(k).ok()));
        let llm = LlmEnricher::new(Arc::new(client)).map_err(SessionError::Runtime)?;
        Self::open_or_fresh_with(config, Some(llm))
    }

    /// Like [`open_or_fresh`](Self::open_or_fresh) with an explicit enricher.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors.
    pub fn open_or_fresh_with(config: LifesimConfig, llm: Option<LlmEnricher>) -> Result<Self> {
        match load_state(&config.paths.state) {
            Ok(Some(state)) => Ok(Self::assemble(config, state, llm)),
            Ok(None) => {
                let state = PersonaState::new(&config);
                Ok(Self::assemble(config, state, llm))
            }
            Err(LifesimError::Snapshot(reason)) => {
                warn!(path = %config.paths.state.display(), %reason, "Malformed state file, starting fresh");
                let state = PersonaState::new(&config);
                Ok(Self::assemble(config, state, llm))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn assemble(config: LifesimConfig, state: PersonaState, llm: Option<LlmEnricher>) -> Self {
        let state_path = config.paths.state.clone();
        let catalogs = Catalogs::load(&config.paths);
        let mut engine = LifeSimEngine::new(state, config).with_catalogs(catalogs);
        if let Some(enricher) = &llm {
            engine = engine.with_enricher(Box::new(enricher.clone()) as Box<dyn Enricher>);
        }
        Self { engine, state_path, llm }
    }

    /// The engine, for operations without a session shortcut.
    #[must_use]
    pub fn engine(&self) -> &LifeSimEngine {
        &self.engine
    }

    /// Mutable engine access.
    pub fn engine_mut(&mut self) -> &mut LifeSimEngine {
        &mut self.engine
    }

    /// Current persona state.
    #[must_use]
    pub fn state(&self) -> &PersonaState {
        self.engine.state()
    }

    /// Where [`save`](Self::save) writes.
    #[must_use]
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// One user turn.
    pub fn turn(&mut self, text: &str, event: Option<&str>) -> PersonaReply {
        self.engine.persona_reply(text, event)
    }

    /// Accept (`Some(label)`) or reject (`None`) a suggestion.
    pub fn act(&mut self, choice: Option<&str>) -> ActionOutcome {
        self.engine.apply_action_result(choice)
    }

    /// One autonomous step.
    pub fn idle(&mut self) -> IdleReport {
        self.engine.idle_tick()
    }

    /// Load `<paths.scenarios>/<name>.json` and make it the active world.
    /// A missing scenario file selects an inert scenario of that name.
    pub fn select_scenario(&mut self, name: &str) {
        let scenario = load_scenario(&self.engine.config().paths.scenarios, name);
        self.engine.select_scenario(&scenario);
    }

    /// Hand over every item of the pack `<paths.items>/<file>`; returns how
    /// many were received.
    pub fn load_items(&mut self, file: &str) -> usize {
        let items = load_items(&self.engine.config().paths.items, file);
        let count = items.len();
        for item in items {
            self.engine.give_item(item);
        }
        count
    }

    /// Write the state file.
    ///
    /// # Errors
    ///
    /// Fails on serialization or I/O errors.
    pub fn save(&self) -> Result<()> {
        save_state(self.engine.state(), &self.state_path)?;
        Ok(())
    }

    /// Render the chronicle, and write it to `path` when given.
    ///
    /// # Errors
    ///
    /// Fails when `path` cannot be written.
    pub fn export_chronicle(&self, path: Option<&Path>) -> Result<String> {
        let text = self.engine.export_chronicle();
        if let Some(path) = path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(LifesimError::from)?;
            }
            std::fs::write(path, &text).map_err(LifesimError::from)?;
            info!(path = %path.display(), "Chronicle exported");
        }
        Ok(text)
    }

    /// Replace the persona with a new one; returns the old state. Nothing is
    /// written until the next save.
    pub fn reset(&mut self) -> PersonaState {
        let fresh = PersonaState::new(self.engine.config());
        info!("Persona reset");
        self.engine.replace_state(fresh)
    }

    /// Chat client configuration, if a client is attached.
    #[must_use]
    pub fn llm_status(&self) -> Option<LlmStatus> {
        self.llm.as_ref().map(|l| l.client().status())
    }

    /// Connectivity check of the attached client.
    ///
    /// # Errors
    ///
    /// [`LlmError::Unavailable`] when no client is attached.
    pub fn ping(&self) -> Result<String> {
        let llm = self.llm.as_ref().ok_or_else(|| LlmError::Unavailable("no chat client attached".into()))?;
        Ok(llm.ping())
    }

    /// Switch the chat model.
    ///
    /// # Errors
    ///
    /// [`LlmError::Unavailable`] without a client, [`LlmError::ConfigError`]
    /// for an unregistered model.
    pub fn set_model(&self, model: &str) -> Result<()> {
        let llm = self.llm.as_ref().ok_or_else(|| LlmError::Unavailable("no chat client attached".into()))?;
        if llm.client().set_model(model) {
            Ok(())
        } else {
            Err(LlmError::ConfigError(format!("unknown model '{model}'")).into())
        }
    }
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// A [`Session`] behind a mutex. Each call is one critical section.
#[derive(Debug, Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Share `session`.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { inner: Arc::new(Mutex::new(session)) }
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// One user turn.
    pub fn turn(&self, text: &str, event: Option<&str>) -> PersonaReply {
        self.with(|s| s.turn(text, event))
    }

    /// Accept or reject a suggestion.
    pub fn act(&self, choice: Option<&str>) -> ActionOutcome {
        self.with(|s| s.act(choice))
    }

    /// One autonomous step.
    pub fn idle(&self) -> IdleReport {
        self.with(Session::idle)
    }

    /// Write the state file.
    ///
    /// # Errors
    ///
    /// See [`Session::save`].
    pub fn save(&self) -> Result<()> {
        self.with(|s| s.save())
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PersonaState {
        self.with(|s| s.state().clone())
    }
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Install a global subscriber. `RUST_LOG` wins over `level`.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(level: &str, json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = if json { builder.json().try_init() } else { builder.try_init() };
    installed.is_ok()
}
