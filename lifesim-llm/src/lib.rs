//! # LifeSim LLM
//!
//! A small chat-completion client for OpenAI-compatible endpoints (Groq by
//! default). The persona engine never depends on it directly; a host wraps
//! [`ChatClient`] in an enrichment adapter.
//!
//! Failures are typed ([`LlmError`]) on [`ChatClient::chat`] and mapped to
//! short `[LLM] …` strings by [`ChatClient::chat_text`], so a caller that
//! only wants text never has to handle an error.

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::ChatClient;
pub use error::LlmError;
pub use types::{ClientSettings, LlmStatus};
