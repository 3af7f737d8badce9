//! Action Recommendation — scoring a catalog of micro-actions against need
//! deficits, then reshaping the pool with the overmind knobs.
//!
//! Score(a) = weight(a) + Σ_{n,δ ∈ effects(a), δ>0, need(n)<55} (55 − need(n)) · δ/10
//!
//! Only positive effects on currently deficient needs contribute; negative
//! effects never penalize. Nothing outside the catalog and the fixed auxiliary
//! pools (fallback, novelty, research) is ever suggested.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::habits::normalize_label;
use crate::needs::{Need, NeedDeltas, NeedState, deltas};

/// Needs below this level count as deficient.
pub const DEFICIT_THRESHOLD: i32 = 55;
/// Size of the scored candidate pool.
pub const CANDIDATE_POOL: usize = 12;
/// Duration tag treated as a long action by the intensity filter.
pub const LONG_DURATION: &str = "15-Min";
/// Skill that unlocks the research action.
pub const RESEARCH_SKILL: &str = "web_research_3_2_1";
/// Probability of a novelty insertion at variety 3.
pub const NOVELTY_CHANCE: f64 = 0.5;
/// Characters compared by the habit-bias prefix match.
const HABIT_PREFIX_CHARS: usize = 5;

/// One micro-action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Display label, also the habit key once normalized.
    pub label: String,
    /// Duration tag such as `"2-Min"` or `"15-Min"`.
    pub duration: String,
    /// Need deltas applied on acceptance.
    #[serde(default)]
    pub need_effects: NeedDeltas,
    /// Base score.
    #[serde(default)]
    pub weight: f64,
}

impl ActionSpec {
    /// Create a spec.
    #[must_use]
    pub fn new(label: &str, duration: &str, effects: &[(&str, i32)], weight: f64) -> Self {
        Self {
            label: label.to_string(),
            duration: duration.to_string(),
            need_effects: deltas(effects),
            weight,
        }
    }

    /// Whether the intensity filter treats this as a long action.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.duration.trim().eq_ignore_ascii_case(LONG_DURATION)
    }
}

/// Composite ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionScore(pub OrderedFloat<f64>);

impl ActionScore {
    /// Raw value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0.into_inner()
    }
}

/// Score `spec` against the current needs.
#[must_use]
pub fn score(spec: &ActionSpec, needs: &NeedState) -> ActionScore {
    let bonus: f64 = spec
        .need_effects
        .iter()
        .filter(|(_, delta)| **delta > 0)
        .filter_map(|(key, delta)| Need::from_key(key).map(|need| (needs.get(need), *delta)))
        .filter(|(level, _)| *level < DEFICIT_THRESHOLD)
        .map(|(level, delta)| f64::from(DEFICIT_THRESHOLD - level) * (f64::from(delta) / 10.0))
        .sum();
    ActionScore(OrderedFloat(spec.weight + bonus))
}

/// The ranking knobs, as set by the overmind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingKnobs {
    /// 1 drops long actions, 3 promotes one.
    pub intensity: u8,
    /// 1 habit bias, 3 novelty.
    pub variety: u8,
    /// Result length before the skill gate.
    pub suggestion_len: u8,
}

/// Read-only catalog of candidate actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionCatalog(pub Vec<ActionSpec>);

impl ActionCatalog {
    /// The catalog shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        Self(vec![
            ActionSpec::new("2-Min atemfokus", "2-Min", &[("calm", 5), ("clarity", 3)], 1.0),
            ActionSpec::new("10-Min ordnungsecke", "10-Min", &[("order", 7), ("calm", 2)], 1.0),
            ActionSpec::new("nachricht an freund", "2-Min", &[("connection", 8)], 1.0),
            ActionSpec::new("kurzer stretch", "2-Min", &[("energy", 4), ("creativity", 2)], 0.9),
            ActionSpec::new("skizze 2 ideen", "5-Min", &[("creativity", 6), ("clarity", 1)], 0.9),
            ActionSpec::new("5-Min tagebuch", "5-Min", &[("clarity", 3), ("calm", 3)], 0.8),
            ActionSpec::new("glas wasser trinken", "2-Min", &[("energy", 2)], 0.7),
            ActionSpec::new("15-Min spaziergang", "15-Min", &[("energy", 5), ("calm", 4)], 0.8),
            ActionSpec::new(
                "15-Min deep work block",
                "15-Min",
                &[("clarity", 6), ("order", 3), ("energy", -2)],
                0.8,
            ),
            ActionSpec::new("anruf bei familie", "10-Min", &[("connection", 7), ("calm", 1)], 0.8),
        ])
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look `label` up (normalized) in this catalog, then in the auxiliary pools.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<ActionSpec> {
        let wanted = normalize_label(label);
        self.0
            .iter()
            .cloned()
            .chain(fallback_pool())
            .chain(novelty_pool())
            .chain(std::iter::once(research_action()))
            .find(|spec| normalize_label(&spec.label) == wanted)
    }
}

/// Suggested when the catalog yields no candidate.
#[must_use]
pub fn fallback_pool() -> Vec<ActionSpec> {
    vec![
        ActionSpec::new("kurzer stretch", "2-Min", &[("energy", 4), ("creativity", 2)], 0.0),
        ActionSpec::new("mini lernnotiz", "5-Min", &[("clarity", 3)], 0.0),
        ActionSpec::new("ordner sortieren", "10-Min", &[("order", 5)], 0.0),
    ]
}

/// Occasional fresh ideas at variety 3.
#[must_use]
pub fn novelty_pool() -> Vec<ActionSpec> {
    vec![
        ActionSpec::new("1 neues wort lernen", "2-Min", &[("clarity", 2), ("creativity", 2)], 0.0),
        ActionSpec::new("fenster öffnen & 5 atemzüge", "2-Min", &[("calm", 3), ("energy", 2)], 0.0),
        ActionSpec::new("ungewohnten weg gehen", "10-Min", &[("creativity", 4), ("energy", 2)], 0.0),
    ]
}

/// Offered once the research skill is unlocked and web research is enabled.
#[must_use]
pub fn research_action() -> ActionSpec {
    ActionSpec::new(
        "web research 3-2-1",
        LONG_DURATION,
        &[("clarity", 5), ("creativity", 2), ("energy", -2)],
        0.0,
    )
}

/// Score, filter and reorder `catalog` into a short suggestion list.
///
/// `top_habits` are normalized labels, most used first; `research_allowed`
/// is the skill gate.
///
/// The shuffle follows the intensity step and overwrites the intensity-3
/// promotion. Keep this order: only intensity 1 shapes the final list.
pub fn rank<R: Rng + ?Sized>(
    catalog: &ActionCatalog,
    needs: &NeedState,
    knobs: RankingKnobs,
    top_habits: &[String],
    research_allowed: bool,
    rng: &mut R,
) -> Vec<ActionSpec> {
    let mut pool: Vec<ActionSpec> = catalog.0.clone();
    // Stable: equal scores keep catalog order.
    pool.sort_by_key(|spec| Reverse(score(spec, needs)));
    pool.truncate(CANDIDATE_POOL);

    apply_intensity(&mut pool, knobs.intensity);
    if pool.is_empty() {
        pool = fallback_pool();
    }

    pool.shuffle(rng);

    match knobs.variety {
        1 => promote_habit(&mut pool, top_habits),
        3 => {
            if rng.gen_bool(NOVELTY_CHANCE) {
                let novelty = novelty_pool();
                if let Some(pick) = novelty.choose(rng) {
                    pool.insert(0, pick.clone());
                }
            }
        }
        _ => {}
    }

    pool.truncate(usize::from(knobs.suggestion_len.clamp(1, 4)));

    if research_allowed {
        let research = research_action();
        if !pool.iter().any(|spec| spec.label == research.label) {
            pool.push(research);
        }
    }
    pool
}

/// Intensity 1 drops long actions; intensity 3 moves the first long one to the front.
fn apply_intensity(pool: &mut Vec<ActionSpec>, intensity: u8) {
    match intensity {
        1 => pool.retain(|spec| !spec.is_long()),
        3 => {
            if let Some(idx) = pool.iter().position(ActionSpec::is_long) {
                let long = pool.remove(idx);
                pool.insert(0, long);
            }
        }
        _ => {}
    }
}

/// Promote the first candidate whose label prefix starts one of the top-3
/// habits. Stops at the first match across all habits.
fn promote_habit(pool: &mut Vec<ActionSpec>, top_habits: &[String]) {
    for habit in top_habits.iter().take(3) {
        let hit = pool.iter().position(|spec| {
            let prefix: String = normalize_label(&spec.label)
                .chars()
                .take(HABIT_PREFIX_CHARS)
                .collect();
            habit.starts_with(&prefix)
        });
        if let Some(idx) = hit {
            let promoted = pool.remove(idx);
            pool.insert(0, promoted);
            return;
        }
    }
}
