//! Error types for the life-simulation core.

use thiserror::Error;

/// Top-level error type for all fallible core operations.
///
/// The turn/action/epoch operations of the engine are total and never
/// return this type; only persistence and configuration loading do.
#[derive(Error, Debug)]
pub enum LifesimError {
    /// Serialization failure while writing a snapshot.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A persisted state snapshot could not be decoded.
    #[error("Invalid state snapshot: {0}")]
    Snapshot(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A skill name that no loaded skill card defines.
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, LifesimError>;
