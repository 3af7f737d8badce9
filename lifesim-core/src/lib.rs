//! # LifeSim Core Library
//!
//! A persistent life-simulation persona: a user talks to it turn by turn, it
//! keeps an internal psychological state and proposes small real-world
//! micro-actions.
//!
//! Every persona is a [`PersonaState`] containing:
//!
//! - **Needs** — six bounded wellbeing scalars with homeostatic decay
//! - **Episodes** — what was said, retrieved by a cheap lexical heuristic
//! - **Habits & preferences** — what was accepted, what keeps being mentioned
//! - **Buffs & debuffs** — turn-limited recurring need modifiers
//! - **Thoughts & artifacts** — internal monologue, dreams and milestones
//! - **Life phase** — a coarse progression advanced at epoch checkpoints
//!
//! [`LifeSimEngine`] drives one state: `persona_reply` for a user turn,
//! `apply_action_result` for accepting a suggestion, `idle_tick` for
//! autonomous steps and `advance_epoch` for checkpoints.
//!
//! ## Determinism
//!
//! With a [`ManualClock`] and a seeded engine (`with_seed`), every operation
//! is reproducible. The only non-deterministic path is the optional
//! [`Enricher`].

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod catalogs;
pub mod chronicle;
pub mod clock;
pub mod config;
pub mod effects;
pub mod engine;
pub mod enrich;
pub mod epoch;
pub mod error;
pub mod habits;
pub mod memory;
pub mod needs;
pub mod objectives;
pub mod overmind;
pub mod persistence;
pub mod retrieval;
pub mod skills;
pub mod state;
pub mod topics;
pub mod types;
pub mod world;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LifesimConfig;
pub use engine::{ActionOutcome, IdleReport, LifeSimEngine, PersonaReply, SuggestedAction};
pub use enrich::Enricher;
pub use error::{LifesimError, Result};
pub use needs::{Need, NeedState};
pub use state::PersonaState;
pub use types::*;
