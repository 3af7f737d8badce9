//! `PersonaState` — the aggregate root of one simulated persona.
//!
//! Everything the engine knows about a persona lives here and is serialised
//! verbatim into the snapshot. Every field carries a serde default so older
//! snapshots keep loading as fields are added.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LifesimConfig;
use crate::effects::{EffectTable, StatusLedger};
use crate::epoch::{EpochReport, PhaseTransition, advance_epoch};
use crate::habits::{HabitCounts, PREFERENCE_STEP, Preferences};
use crate::memory::{Artifact, Episode, Note, Thought};
use crate::needs::NeedState;
use crate::objectives::{DailyObjective, generate_objectives};
use crate::overmind::OvermindState;
use crate::skills::SkillBook;
use crate::types::{LifePhase, Location, TimeBlock};
use crate::world::{Item, WorldState};

/// Homeostatic pull applied to every need at day rollover.
pub const DAILY_DECAY: i32 = 2;

// ---------------------------------------------------------------------------
// Profile & stats
// ---------------------------------------------------------------------------

/// Who the persona is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// Display name.
    pub name: String,
    /// Core values.
    #[serde(default)]
    pub values: Vec<String>,
    /// Long-term goals.
    #[serde(default)]
    pub goals: Vec<String>,
    /// Temperament adjectives.
    #[serde(default)]
    pub temperament: Vec<String>,
    /// Voice style, hyphen-separated adjectives.
    #[serde(default)]
    pub voice_style: String,
}

impl Default for PersonaProfile {
    fn default() -> Self {
        Self::named("Ari")
    }
}

impl PersonaProfile {
    /// The default profile under another name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            name: name.to_string(),
            values: owned(&["ehrlichkeit", "lernen", "verbundenheit", "gesundheit"]),
            goals: owned(&[
                "täglich etwas dazulernen",
                "verbundenheit pflegen",
                "körperlich aktiv bleiben",
            ]),
            temperament: owned(&["ruhig", "strukturiert", "warm"]),
            voice_style: "kurz-konkret-warm".to_string(),
        }
    }
}

/// Cumulative maxima.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Longest success streak seen.
    pub discipline: u32,
    /// Focus thoughts emitted.
    pub insight: u32,
    /// Longest rejection streak seen.
    pub resilience: u32,
}

// ---------------------------------------------------------------------------
// PersonaState
// ---------------------------------------------------------------------------

/// The whole persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaState {
    /// Identity.
    pub profile: PersonaProfile,
    /// The six needs.
    pub needs: NeedState,
    /// Append-only episode log.
    pub episodes: Vec<Episode>,
    /// Reflection notes.
    pub notes: Vec<Note>,
    /// Mined preferences.
    pub preferences: Preferences,
    /// Accepted action counts.
    pub habit_counts: HabitCounts,
    /// Active buffs.
    pub buffs: StatusLedger,
    /// Active debuffs.
    pub debuffs: StatusLedger,
    /// Completed persona turns.
    pub turn: u64,
    /// Experience points.
    pub xp: u32,
    /// Current place.
    pub location: Location,
    /// Current time of day.
    pub time_block: TimeBlock,
    /// Day counter, starting at 1.
    pub day: u32,
    /// Epochs completed.
    pub epoch: u32,
    /// Coarse life phase.
    pub life_phase: LifePhase,
    /// Every phase change so far.
    pub phase_history: Vec<PhaseTransition>,
    /// Internal monologue.
    pub thoughts: Vec<Thought>,
    /// Controller knobs and ticker state.
    pub overmind: OvermindState,
    /// Consecutive accepted actions.
    pub streak: u32,
    /// Consecutive rejected suggestions.
    pub rejection_streak: u32,
    /// Cumulative maxima.
    pub stats: Stats,
    /// Milestones and summaries.
    pub artifacts: Vec<Artifact>,
    /// Topic id → mentions.
    pub topics: BTreeMap<String, u32>,
    /// Today's objectives.
    pub objectives: Vec<DailyObjective>,
    /// Day the objectives were generated for.
    pub objectives_day: Option<u32>,
    /// Unlocked achievement names.
    pub achievements: BTreeSet<String>,
    /// Unlocked skills and levels.
    pub skills: SkillBook,
    /// Scenario and entities.
    pub world: WorldState,
    /// Held items.
    pub items: Vec<Item>,
    /// Whether tonight's dream already happened.
    pub dreamed_tonight: bool,
    /// Episode cap enforced at epoch compression.
    pub max_episode_history: usize,
    /// Whether the research action may be offered.
    pub web_research: bool,
}

impl Default for PersonaState {
    fn default() -> Self {
        Self::new(&LifesimConfig::default())
    }
}

/// What one time-block advance did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeAdvance {
    /// Block entered.
    pub time_block: TimeBlock,
    /// Whether a new day began.
    pub new_day: bool,
    /// Automatic epoch, if one was due.
    pub epoch: Option<EpochReport>,
}

impl PersonaState {
    /// A fresh persona.
    #[must_use]
    pub fn new(config: &LifesimConfig) -> Self {
        Self {
            profile: PersonaProfile::named(&config.general.persona_name),
            needs: NeedState::default(),
            episodes: Vec::new(),
            notes: Vec::new(),
            preferences: Preferences::default(),
            habit_counts: HabitCounts::default(),
            buffs: StatusLedger::default(),
            debuffs: StatusLedger::default(),
            turn: 0,
            xp: 0,
            location: Location::default(),
            time_block: TimeBlock::default(),
            day: 1,
            epoch: 0,
            life_phase: LifePhase::default(),
            phase_history: Vec::new(),
            thoughts: Vec::new(),
            overmind: OvermindState::new(&config.overmind),
            streak: 0,
            rejection_streak: 0,
            stats: Stats::default(),
            artifacts: Vec::new(),
            topics: BTreeMap::new(),
            objectives: Vec::new(),
            objectives_day: None,
            achievements: BTreeSet::new(),
            skills: SkillBook::default(),
            world: WorldState::default(),
            items: Vec::new(),
            dreamed_tonight: false,
            max_episode_history: config.persona.max_episode_history,
            web_research: config.persona.web_research,
        }
    }

    // ------------------------------------------------------------------
    // Logs
    // ------------------------------------------------------------------

    /// Append an episode.
    pub fn add_episode(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    /// Append a reflection note.
    pub fn add_note(&mut self, text: impl Into<String>, ts: DateTime<Utc>) {
        self.notes.push(Note { ts, text: text.into() });
    }

    /// Append a thought, counting focus thoughts as insight.
    pub fn add_thought(&mut self, thought: Thought) {
        if thought.is_focus() {
            self.stats.insight += 1;
        }
        self.thoughts.push(thought);
    }

    /// Count one mention of `topic`.
    pub fn record_topic(&mut self, topic: &str) {
        *self.topics.entry(topic.to_string()).or_insert(0) += 1;
    }

    // ------------------------------------------------------------------
    // Habits & preferences
    // ------------------------------------------------------------------

    /// Reinforce a preference by the default step.
    pub fn upsert_preference(&mut self, key: &str) {
        self.preferences.upsert(key, PREFERENCE_STEP);
    }

    /// Count one acceptance of `label`.
    pub fn record_habit(&mut self, label: &str) -> u32 {
        self.habit_counts.record(label)
    }

    /// The `n` heaviest preferences.
    #[must_use]
    pub fn top_preferences(&self, n: usize) -> Vec<String> {
        self.preferences.top(n)
    }

    /// The `n` most used habits.
    #[must_use]
    pub fn top_habits(&self, n: usize) -> Vec<String> {
        self.habit_counts.top(n)
    }

    // ------------------------------------------------------------------
    // Streaks
    // ------------------------------------------------------------------

    /// An accepted action: extend the streak and the discipline maximum.
    pub fn register_success(&mut self) {
        self.streak += 1;
        self.rejection_streak = 0;
        self.stats.discipline = self.stats.discipline.max(self.streak);
    }

    /// A rejected suggestion list: reset the streak, track resilience.
    pub fn register_rejection(&mut self) -> u32 {
        self.streak = 0;
        self.rejection_streak += 1;
        self.stats.resilience = self.stats.resilience.max(self.rejection_streak);
        self.rejection_streak
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Advance one time block.
    ///
    /// Status effects tick first. Wrapping to `Morning` starts a new day:
    /// needs decay, the dream flag resets, items apply, objectives are
    /// regenerated (once per day) and an epoch runs when one is due.
    pub fn advance_time(&mut self, effects: &EffectTable, epoch_every_days: u32, now: DateTime<Utc>) -> TimeAdvance {
        self.time_block = self.time_block.next();
        effects.tick(&mut self.needs, &mut self.buffs, &mut self.debuffs);

        let mut advance = TimeAdvance {
            time_block: self.time_block,
            ..TimeAdvance::default()
        };
        if self.time_block != TimeBlock::Morning {
            return advance;
        }

        advance.new_day = true;
        self.day += 1;
        self.needs.decay_towards_mid(DAILY_DECAY);
        self.dreamed_tonight = false;
        for item in &self.items {
            item.apply(&mut self.needs, &mut self.buffs);
        }
        self.refresh_objectives();
        info!(day = self.day, items = self.items.len(), "New day");

        if epoch_every_days > 0 && self.day % epoch_every_days == 0 {
            advance.epoch = Some(advance_epoch(self, now));
        }
        advance
    }

    /// Regenerate objectives unless they were already made today.
    pub fn refresh_objectives(&mut self) -> bool {
        if self.objectives_day == Some(self.day) {
            return false;
        }
        self.objectives = generate_objectives(&self.needs);
        self.objectives_day = Some(self.day);
        debug!(day = self.day, objectives = ?self.objectives, "Objectives generated");
        true
    }
}
