//! Overmind — the adaptive controller behind action ranking, plus the
//! thought ticker and dream generator it paces.
//!
//! The knobs are derived, not chosen: every turn they are recomputed from the
//! needs and the success streak, unless the caller pinned them.
//!
//! | knob            | rule                                                   |
//! |-----------------|--------------------------------------------------------|
//! | ticker interval | clarity < 40: −500 ms (floor 4000), else +250 ms (cap 8000) |
//! | intensity       | energy < 40 → 1; energy > 65 ∧ clarity > 55 → 3; else 2 |
//! | variety         | connection < 40 → 1; connection > 60 → 3; else 2      |
//! | suggestion len  | streak ≤ 1 → 2; streak ≤ 3 → 3; else 4                 |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::RankingKnobs;
use crate::config::OvermindConfig;
use crate::memory::thought::{SOURCE_DREAM, SOURCE_FOCUS, SOURCE_TICKER};
use crate::memory::{Episode, Thought};
use crate::needs::NeedState;
use crate::types::{Actor, truncate_chars};

/// Characters kept from each summarized episode.
const TICK_EXCERPT_CHARS: usize = 40;

/// Persisted controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvermindState {
    /// Current ticker interval.
    pub thought_interval_ms: u64,
    /// Ranking intensity, 1–3.
    pub intensity: u8,
    /// Ranking variety, 1–3.
    pub variety: u8,
    /// Suggestion length, 1–4.
    pub suggestion_len: u8,
    /// When set, `retune` leaves the knobs alone.
    #[serde(default)]
    pub pinned: bool,
    /// Whether the ticker runs at all.
    #[serde(default = "default_true")]
    pub thought_active: bool,
    /// Suppresses every thought while set.
    #[serde(default)]
    pub thought_mute: bool,
    /// Last ticker fire.
    #[serde(default)]
    pub last_thought_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Default for OvermindState {
    fn default() -> Self {
        Self::new(&OvermindConfig::default())
    }
}

impl OvermindState {
    /// Fresh controller state.
    #[must_use]
    pub fn new(config: &OvermindConfig) -> Self {
        Self {
            thought_interval_ms: config.initial_interval_ms,
            intensity: 2,
            variety: 2,
            suggestion_len: 2,
            pinned: false,
            thought_active: true,
            thought_mute: false,
            last_thought_at: None,
        }
    }

    /// Knobs as consumed by the ranking step.
    #[must_use]
    pub fn ranking_knobs(&self) -> RankingKnobs {
        RankingKnobs {
            intensity: self.intensity,
            variety: self.variety,
            suggestion_len: self.suggestion_len,
        }
    }

    /// Whether thoughts may be emitted at all.
    #[must_use]
    pub fn thoughts_enabled(&self) -> bool {
        self.thought_active && !self.thought_mute
    }
}

/// Knob values after a retune, for transparency logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnobReport {
    /// Ticker interval.
    pub thought_interval_ms: u64,
    /// Intensity.
    pub intensity: u8,
    /// Variety.
    pub variety: u8,
    /// Suggestion length.
    pub suggestion_len: u8,
}

impl From<&OvermindState> for KnobReport {
    fn from(state: &OvermindState) -> Self {
        Self {
            thought_interval_ms: state.thought_interval_ms,
            intensity: state.intensity,
            variety: state.variety,
            suggestion_len: state.suggestion_len,
        }
    }
}

/// Recompute the knobs from needs and streak. Deterministic.
pub fn retune(state: &mut OvermindState, needs: &NeedState, streak: u32, config: &OvermindConfig) -> KnobReport {
    if state.pinned {
        return KnobReport::from(&*state);
    }

    state.thought_interval_ms = if needs.clarity < 40 {
        state
            .thought_interval_ms
            .saturating_sub(config.step_down_ms)
            .max(config.min_interval_ms)
    } else {
        (state.thought_interval_ms + config.step_up_ms).min(config.max_interval_ms)
    };

    state.intensity = if needs.energy < 40 {
        1
    } else if needs.energy > 65 && needs.clarity > 55 {
        3
    } else {
        2
    };

    state.variety = if needs.connection < 40 {
        1
    } else if needs.connection > 60 {
        3
    } else {
        2
    };

    state.suggestion_len = match streak {
        0 | 1 => 2,
        2 | 3 => 3,
        _ => 4,
    };

    let report = KnobReport::from(&*state);
    debug!(?report, streak, "Overmind retuned");
    report
}

/// Whether the ticker should fire at `now`.
#[must_use]
pub fn ticker_due(state: &OvermindState, now: DateTime<Utc>) -> bool {
    if !state.thoughts_enabled() {
        return false;
    }
    match state.last_thought_at {
        None => true,
        Some(last) => {
            let elapsed = (now - last).num_milliseconds();
            elapsed > i64::try_from(state.thought_interval_ms).unwrap_or(i64::MAX)
        }
    }
}

/// Summarize the last two user episodes into one monologue line.
///
/// Returns `None` when nothing has been said yet.
#[must_use]
pub fn compose_tick_thought(episodes: &[Episode], now: DateTime<Utc>, max_len: usize) -> Option<Thought> {
    let mut recent: Vec<&Episode> = episodes
        .iter()
        .rev()
        .filter(|ep| ep.actor == Actor::User)
        .take(2)
        .collect();
    if recent.is_empty() {
        return None;
    }
    recent.reverse();

    let excerpts: Vec<String> = recent
        .iter()
        .map(|ep| truncate_chars(&ep.text, TICK_EXCERPT_CHARS))
        .collect();
    let text = truncate_chars(&format!("Gedanke: {}", excerpts.join(" … ")), max_len);

    let focused = recent.iter().any(|ep| {
        let lower = ep.text.to_lowercase();
        lower.contains("fokus") || lower.contains("focus")
    });
    let source = if focused { SOURCE_FOCUS } else { SOURCE_TICKER };

    let mut thought = Thought::new(now, text, source);
    for (i, ep) in recent.iter().enumerate() {
        thought = thought.with_ref(format!("episode_{i}"), ep.id);
    }
    Some(thought)
}

/// A nightly dream woven from the strongest preference and the weakest need.
#[must_use]
pub fn compose_dream(
    needs: &NeedState,
    top_preference: Option<&str>,
    day: u32,
    now: DateTime<Utc>,
    max_len: usize,
) -> Thought {
    let weakest = needs.lowest(1).first().map_or("calm", |n| n.key());
    let motif = top_preference.unwrap_or("stille");
    let text = truncate_chars(
        &format!("Traum: {motif} verwebt sich mit dem Wunsch nach mehr {weakest}."),
        max_len,
    );
    Thought::new(now, text, SOURCE_DREAM).with_ref("day", day)
}
