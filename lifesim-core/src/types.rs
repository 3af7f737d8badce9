//! Core type definitions shared across the persona state.
//!
//! All types are serializable; enum variants serialize to the upper-case
//! (time/location) or snake-case (actor/phase) names used in snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeId(pub Uuid);

impl EpisodeId {
    /// Create a new random episode ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EpisodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// Who produced an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// The human on the other side.
    #[default]
    User,
    /// The simulated persona.
    Persona,
    /// Engine-generated (events, summaries).
    System,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Persona => "persona",
            Self::System => "system",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Time & Place
// ---------------------------------------------------------------------------

/// Coarse time-of-day. Advancing past `Night` wraps to `Morning` (day rollover).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeBlock {
    /// First block of a day.
    #[default]
    Morning,
    /// Second block.
    Midday,
    /// Third block.
    Evening,
    /// Last block; dreams happen here.
    Night,
}

impl TimeBlock {
    /// The block after this one, wrapping `Night` to `Morning`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Morning => Self::Midday,
            Self::Midday => Self::Evening,
            Self::Evening => Self::Night,
            Self::Night => Self::Morning,
        }
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Morning => "MORNING",
            Self::Midday => "MIDDAY",
            Self::Evening => "EVENING",
            Self::Night => "NIGHT",
        };
        f.write_str(s)
    }
}

/// Where the persona currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Location {
    /// At home.
    #[default]
    Home,
    /// At work.
    Work,
    /// Outdoors.
    Outside,
    /// With other people.
    Social,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Home => "HOME",
            Self::Work => "WORK",
            Self::Outside => "OUTSIDE",
            Self::Social => "SOCIAL",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Life Phase
// ---------------------------------------------------------------------------

/// Coarse life phase. Only ever advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum LifePhase {
    /// Starting phase.
    #[default]
    #[serde(rename = "phase_1")]
    Phase1,
    /// Reached at epoch 2 or 40 xp.
    #[serde(rename = "phase_2")]
    Phase2,
    /// Reached at epoch 4 or 120 xp.
    #[serde(rename = "phase_3")]
    Phase3,
    /// Reached at epoch 6 or 250 xp.
    #[serde(rename = "phase_4")]
    Phase4,
}

impl LifePhase {
    /// The phase after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Phase1 => Some(Self::Phase2),
            Self::Phase2 => Some(Self::Phase3),
            Self::Phase3 => Some(Self::Phase4),
            Self::Phase4 => None,
        }
    }
}

impl fmt::Display for LifePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Phase1 => "phase_1",
            Self::Phase2 => "phase_2",
            Self::Phase3 => "phase_3",
            Self::Phase4 => "phase_4",
        };
        f.write_str(s)
    }
}

/// Characters-not-bytes truncation; persona text is mostly German.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_block_wraps_after_night() {
        assert_eq!(TimeBlock::Morning.next(), TimeBlock::Midday);
        assert_eq!(TimeBlock::Night.next(), TimeBlock::Morning);
    }

    #[test]
    fn life_phase_serializes_snake_names() {
        let json = serde_json::to_string(&LifePhase::Phase3).expect("ser");
        assert_eq!(json, "\"phase_3\"");
        assert_eq!(LifePhase::Phase4.next(), None);
        assert!(LifePhase::Phase2 > LifePhase::Phase1);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("müde und unruhig", 4), "müde");
        assert_eq!(truncate_chars("ab", 10), "ab");
        assert_eq!(truncate_chars("Prüfe", 3), "Prü");
        assert_eq!(truncate_chars("", 0), "");
    }
}
