//! Episodic memory — one logged turn of dialogue.
//!
//! Episodes are immutable after creation and kept in insertion order, which
//! is also chronological order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Actor, EpisodeId};

/// Default importance for ordinary dialogue.
pub const DEFAULT_IMPORTANCE: f32 = 0.5;

/// A single recorded utterance or engine event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Unique identifier.
    #[serde(default)]
    pub id: EpisodeId,
    /// When it was recorded.
    pub ts: DateTime<Utc>,
    /// Who produced it.
    #[serde(default)]
    pub actor: Actor,
    /// Free text.
    pub text: String,
    /// Tag set (deduplicated, insertion order).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Significance in `[0, 1]`.
    #[serde(default = "default_importance")]
    pub importance: f32,
    /// Topic id assigned at ingestion, if any keyword matched.
    #[serde(default)]
    pub topic: Option<String>,
}

fn default_importance() -> f32 {
    DEFAULT_IMPORTANCE
}

impl Episode {
    /// Create an episode with default importance and no tags.
    #[must_use]
    pub fn new(actor: Actor, text: impl Into<String>, ts: DateTime<Utc>) -> Self {
        Self {
            id: EpisodeId::new(),
            ts,
            actor,
            text: text.into(),
            tags: Vec::new(),
            importance: DEFAULT_IMPORTANCE,
            topic: None,
        }
    }

    /// Set importance, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = importance.clamp(0.0, 1.0);
        self
    }

    /// Add a tag unless already present.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Attach a topic id.
    #[must_use]
    pub fn with_topic(mut self, topic: Option<String>) -> Self {
        self.topic = topic;
        self
    }
}
