//! Thoughts — synthesized internal monologue lines.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag of a ticker line.
pub const SOURCE_TICKER: &str = "ticker";
/// Source tag of a ticker line about focus; counted as insight.
pub const SOURCE_FOCUS: &str = "focus";
/// Source tag of a nightly dream.
pub const SOURCE_DREAM: &str = "dream";

/// One monologue line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    /// When it was emitted.
    pub ts: DateTime<Utc>,
    /// Text, already length-capped.
    pub text: String,
    /// Which generator produced it.
    pub source: String,
    /// Free-form references (turn number, day, episode ids).
    #[serde(default)]
    pub refs: BTreeMap<String, String>,
}

impl Thought {
    /// Create a thought without references.
    #[must_use]
    pub fn new(ts: DateTime<Utc>, text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            ts,
            text: text.into(),
            source: source.into(),
            refs: BTreeMap::new(),
        }
    }

    /// Attach a reference.
    #[must_use]
    pub fn with_ref(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.refs.insert(key.into(), value.to_string());
        self
    }

    /// Whether this thought counts toward the insight stat.
    #[must_use]
    pub fn is_focus(&self) -> bool {
        self.source == SOURCE_FOCUS
    }
}
