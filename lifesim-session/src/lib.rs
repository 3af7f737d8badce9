//! # lifesim-session — hosting a persona
//!
//! Glue between the pure `lifesim-core` engine and the outside world:
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │               host (CLI, UI)               │
//! │  ┌──────────────────────────────────────┐  │
//! │  │          lifesim-session             │  │
//! │  │  config ─▶ Session ─▶ state file     │  │
//! │  │              │                       │  │
//! │  │              ▼                       │  │
//! │  │   LifeSimEngine ◀── LlmEnricher      │  │
//! │  │   (lifesim-core)    (lifesim-llm)    │  │
//! │  └──────────────────────────────────────┘  │
//! └────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config` — TOML loading plus `GROQ_*` environment overrides
//! - `bridge` — the chat client as the engine's enrichment collaborator
//! - `session` — state file ownership, turn serialisation, tracing setup

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod bridge;
pub mod config;
pub mod session;

pub use bridge::LlmEnricher;
pub use session::{Session, SessionError, SharedSession, init_tracing};
