//! Artifacts — permanent records of milestones, summaries and dreams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Effect tag of an epoch summary.
pub const EFFECT_SUMMARY: &str = "summary";
/// Effect tag of an XP milestone.
pub const EFFECT_MILESTONE: &str = "milestone";
/// Effect tag of a dream insight.
pub const EFFECT_INSIGHT: &str = "insight";

/// A milestone record. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Epoch during which it was minted.
    pub epoch: u32,
    /// Short title.
    pub title: String,
    /// Effect tag.
    pub effect: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A reflection note written every few turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// When it was written.
    pub ts: DateTime<Utc>,
    /// Text.
    pub text: String,
}
