//! Habit counters and mined preferences.
//!
//! Habits count how often an action label was accepted; preferences weight
//! tokens the user keeps mentioning. Both only ever grow.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tokens mined from user text as preferences.
pub const PREFERENCE_TOKENS: [&str; 4] = ["morgens", "abends", "ruhig", "fokus"];

/// Default reinforcement per mention.
pub const PREFERENCE_STEP: f32 = 0.2;
/// Weight ceiling.
pub const PREFERENCE_MAX: f32 = 3.0;

/// Lower-cased, trimmed action label used as habit key.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Usage count per normalized action label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitCounts(pub BTreeMap<String, u32>);

impl HabitCounts {
    /// Count one more use of `label`.
    pub fn record(&mut self, label: &str) -> u32 {
        let count = self.0.entry(normalize_label(label)).or_insert(0);
        *count += 1;
        *count
    }

    /// Uses of `label` so far.
    #[must_use]
    pub fn count(&self, label: &str) -> u32 {
        self.0.get(&normalize_label(label)).copied().unwrap_or(0)
    }

    /// The `n` most used labels. The order among equal counts is unspecified.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<String> {
        let mut entries: Vec<(&String, &u32)> = self.0.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        entries.into_iter().take(n).map(|(k, _)| k.clone()).collect()
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A weighted preference token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    /// The mined token.
    pub key: String,
    /// Accumulated weight in `[1.0, 3.0]`.
    pub weight: f32,
}

/// All preferences, unique by key, in first-mention order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(pub Vec<Preference>);

impl Preferences {
    /// Reinforce `key` by `delta`, inserting it at `1.0 + delta` if new.
    pub fn upsert(&mut self, key: &str, delta: f32) {
        if let Some(pref) = self.0.iter_mut().find(|p| p.key == key) {
            pref.weight = (pref.weight + delta).min(PREFERENCE_MAX);
            return;
        }
        self.0.push(Preference {
            key: key.to_string(),
            weight: (1.0 + delta).min(PREFERENCE_MAX),
        });
    }

    /// Weight of `key`, if known.
    #[must_use]
    pub fn weight(&self, key: &str) -> Option<f32> {
        self.0.iter().find(|p| p.key == key).map(|p| p.weight)
    }

    /// The `n` heaviest keys. The order among equal weights is unspecified.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<String> {
        let mut prefs: Vec<&Preference> = self.0.iter().collect();
        prefs.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        prefs.into_iter().take(n).map(|p| p.key.clone()).collect()
    }

    /// Number of preferences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no preference was mined yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Preference tokens that occur in `text` (case-insensitive substring).
#[must_use]
pub fn mine_preferences(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    PREFERENCE_TOKENS
        .into_iter()
        .filter(|token| lower.contains(token))
        .collect()
}
