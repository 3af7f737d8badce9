//! `LifeSimEngine` — one turn at a time over a [`PersonaState`].
//!
//! # Turn pipeline
//!
//! ```text
//! persona_reply(text, event)
//!   ├─ turn += 1
//!   ├─ thought ticker (gated by mute flag and interval)
//!   ├─ ingest: user episode, topic, preferences
//!   ├─ event effects
//!   ├─ retrieve context
//!   ├─ reflection every N turns
//!   ├─ rank actions
//!   ├─ compose reply ─▶ optional enrichment
//!   ├─ persona episode
//!   └─ overmind retune
//! ```
//!
//! Acceptance of a suggestion is a separate call
//! ([`LifeSimEngine::apply_action_result`]) that moves time forward.
//!
//! Every operation here is total. The engine owns the state and a single
//! caller drives it; hosts serving concurrent turns wrap the whole engine in a
//! lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::actions::{self, ActionSpec, RESEARCH_SKILL, RankingKnobs, research_action};
use crate::catalogs::Catalogs;
use crate::chronicle::render_chronicle;
use crate::clock::{Clock, SystemClock};
use crate::config::LifesimConfig;
use crate::effects::OVERSTIMULATED;
use crate::enrich::{Enricher, is_diagnostic};
use crate::epoch::{self, EpochReport};
use crate::error::Result;
use crate::habits::{mine_preferences, normalize_label};
use crate::memory::artifact::{EFFECT_INSIGHT, EFFECT_MILESTONE};
use crate::memory::{Artifact, Episode, Thought};
use crate::needs::{NeedDeltas, NeedState};
use crate::objectives::{OBJECTIVE_XP, Progress, check_achievements, complete_objectives, crossed_milestones};
use crate::overmind::{self, KnobReport};
use crate::retrieval::MemoryIndex;
use crate::skills::AutounlockReport;
use crate::state::PersonaState;
use crate::topics::detect_topic;
use crate::types::{Actor, TimeBlock, truncate_chars};
use crate::world::{Item, Scenario};

/// Consecutive rejections that overstimulate the persona.
pub const REJECTION_LIMIT: u32 = 3;
/// Advances the overstimulation debuff lasts.
pub const OVERSTIMULATED_TURNS: u32 = 2;
/// Importance of system episodes logged for events.
pub const EVENT_IMPORTANCE: f32 = 0.7;
/// Chance that a dream also mints an insight artifact.
pub const DREAM_INSIGHT_CHANCE: f64 = 0.25;
/// Characters of retrieved context quoted in a local reply.
const CONTEXT_CHARS: usize = 140;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A suggested action as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedAction {
    /// Label to accept.
    pub label: String,
    /// Duration tag.
    pub duration: String,
}

impl From<&ActionSpec> for SuggestedAction {
    fn from(spec: &ActionSpec) -> Self {
        Self {
            label: spec.label.clone(),
            duration: spec.duration.clone(),
        }
    }
}

/// Everything one turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaReply {
    /// Reply text.
    pub reply: String,
    /// Ranked suggestions.
    pub actions: Vec<SuggestedAction>,
    /// Reflection note, on every N-th turn.
    pub reflection: Option<String>,
    /// Deltas of the event applied this turn (empty if none).
    pub event_effects: NeedDeltas,
    /// Needs after the turn.
    pub needs: NeedState,
    /// Knobs after the retune.
    pub knobs: KnobReport,
    /// Thought emitted by the ticker this turn.
    pub thought: Option<Thought>,
    /// Detected topic of the user text.
    pub topic: Option<String>,
    /// Enrichment failure, when the local reply was kept because of it.
    pub diagnostic: Option<String>,
}

/// What accepting or rejecting a suggestion did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOutcome {
    /// Accepted label, `None` for a rejection.
    pub accepted: Option<String>,
    /// Need deltas applied directly by the action.
    pub effects: NeedDeltas,
    /// Buffs granted by trigger keywords.
    pub buffs_granted: Vec<String>,
    /// Whether a new day began.
    pub new_day: bool,
    /// Automatic epoch, if one ran.
    pub epoch: Option<EpochReport>,
    /// Objectives completed by this action.
    pub objectives_completed: u32,
    /// Milestone artifacts minted.
    pub milestones: Vec<Artifact>,
    /// Achievements unlocked.
    pub achievements: Vec<String>,
}

/// What an idle tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdleReport {
    /// World tick after the call.
    pub tick: u64,
    /// Event fired by the scenario bias, if any.
    pub event: Option<String>,
    /// Dream, if one happened.
    pub dream: Option<Thought>,
    /// Insight artifact minted by the dream.
    pub insight: Option<Artifact>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Drives one persona.
pub struct LifeSimEngine {
    state: PersonaState,
    config: LifesimConfig,
    catalogs: Catalogs,
    index: MemoryIndex,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    enricher: Option<Box<dyn Enricher>>,
}

impl std::fmt::Debug for LifeSimEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifeSimEngine")
            .field("turn", &self.state.turn)
            .field("epoch", &self.state.epoch)
            .field("enricher", &self.enricher.is_some())
            .finish_non_exhaustive()
    }
}

impl LifeSimEngine {
    /// An engine over `state` with built-in catalogs and the system clock.
    #[must_use]
    pub fn new(state: PersonaState, config: LifesimConfig) -> Self {
        let index = MemoryIndex::new(config.retrieval.clone());
        Self {
            state,
            config,
            catalogs: Catalogs::builtin(),
            index,
            clock: Arc::new(SystemClock),
            rng: StdRng::from_entropy(),
            enricher: None,
        }
    }

    /// Replace the data catalogs.
    #[must_use]
    pub fn with_catalogs(mut self, catalogs: Catalogs) -> Self {
        self.catalogs = catalogs;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed the random source for reproducible shuffles and rolls.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Attach a text-enrichment collaborator.
    #[must_use]
    pub fn with_enricher(mut self, enricher: Box<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// The persona.
    #[must_use]
    pub fn state(&self) -> &PersonaState {
        &self.state
    }

    /// Mutable access for hosts that adjust flags directly.
    pub fn state_mut(&mut self) -> &mut PersonaState {
        &mut self.state
    }

    /// Give the state back.
    #[must_use]
    pub fn into_state(self) -> PersonaState {
        self.state
    }

    /// Swap in another state, returning the old one.
    pub fn replace_state(&mut self, state: PersonaState) -> PersonaState {
        std::mem::replace(&mut self.state, state)
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &LifesimConfig {
        &self.config
    }

    /// Active catalogs.
    #[must_use]
    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ------------------------------------------------------------------
    // Turn
    // ------------------------------------------------------------------

    /// Process one user turn.
    pub fn persona_reply(&mut self, user_text: &str, event: Option<&str>) -> PersonaReply {
        let now = self.now();
        self.state.turn += 1;
        let turn = self.state.turn;
        debug!(turn, event, "Turn started");

        let thought = self.tick_thought(now);
        let topic = self.ingest_user_input(user_text, now);
        let event_effects = event.map(|key| self.apply_event(key, now)).unwrap_or_default();

        let context: Vec<String> = self
            .index
            .retrieve(&self.state.episodes, user_text, self.config.persona.retrieval_k)
            .into_iter()
            .map(|hit| hit.episode.text.clone())
            .collect();

        let every = self.config.persona.reflection_every;
        let reflection = (every > 0 && turn % every == 0).then(|| {
            let prefs = self.state.top_preferences(3);
            let prefs = if prefs.is_empty() {
                "(noch keine)".to_string()
            } else {
                prefs.join(", ")
            };
            let text = format!("Reflexion: Ich achte auf {prefs}. Bedürfnisse balanciere ich aktiv.");
            self.state.add_note(text.clone(), now);
            text
        });

        let suggestions = self.suggest_actions();
        let local = self.compose_reply(&context, &suggestions);
        let (reply, diagnostic) = self.enrich_reply(user_text, local);

        self.state
            .add_episode(Episode::new(Actor::Persona, reply.clone(), now));

        let knobs = overmind::retune(
            &mut self.state.overmind,
            &self.state.needs,
            self.state.streak,
            &self.config.overmind,
        );

        info!(
            turn,
            actions = suggestions.len(),
            reflection = reflection.is_some(),
            thought = thought.is_some(),
            "Turn completed"
        );

        PersonaReply {
            reply,
            actions: suggestions.iter().map(SuggestedAction::from).collect(),
            reflection,
            event_effects,
            needs: self.state.needs,
            knobs,
            thought,
            topic: topic.map(str::to_string),
            diagnostic,
        }
    }

    fn tick_thought(&mut self, now: DateTime<Utc>) -> Option<Thought> {
        if !overmind::ticker_due(&self.state.overmind, now) {
            return None;
        }
        let thought = overmind::compose_tick_thought(&self.state.episodes, now, self.config.persona.thought_max_len)?
            .with_ref("turn", self.state.turn);
        self.state.overmind.last_thought_at = Some(now);
        debug!(source = %thought.source, text = %thought.text, "Thought emitted");
        self.state.add_thought(thought.clone());
        Some(thought)
    }

    fn ingest_user_input(&mut self, text: &str, now: DateTime<Utc>) -> Option<&'static str> {
        let topic = detect_topic(text);
        self.state
            .add_episode(Episode::new(Actor::User, text, now).with_topic(topic.map(str::to_string)));
        if let Some(topic) = topic {
            self.state.record_topic(topic);
        }
        for token in mine_preferences(text) {
            self.state.upsert_preference(token);
        }
        topic
    }

    /// Apply a named event; unknown keys change nothing.
    fn apply_event(&mut self, key: &str, now: DateTime<Utc>) -> NeedDeltas {
        let Some(effects) = self.catalogs.events.effects(key).cloned() else {
            debug!(event = key, "Unknown event ignored");
            return NeedDeltas::new();
        };
        self.state.needs.apply_delta(&effects);
        self.state.add_episode(
            Episode::new(Actor::System, format!("Ereignis: {key}"), now)
                .with_tag("event")
                .with_importance(EVENT_IMPORTANCE),
        );
        debug!(event = key, ?effects, "Event applied");
        effects
    }

    /// Rank suggestions for the current state.
    pub fn suggest_actions(&mut self) -> Vec<ActionSpec> {
        let research_allowed = self.state.web_research && self.state.skills.is_unlocked(RESEARCH_SKILL);
        let top_habits = self.state.top_habits(3);
        actions::rank(
            &self.catalogs.actions,
            &self.state.needs,
            self.state.overmind.ranking_knobs(),
            &top_habits,
            research_allowed,
            &mut self.rng,
        )
    }

    fn compose_reply(&self, context: &[String], suggestions: &[ActionSpec]) -> String {
        let needs = &self.state.needs;
        let mut mood_bits = Vec::new();
        if needs.energy < 40 {
            mood_bits.push("etwas niedrige Energie");
        }
        if needs.connection < 40 {
            mood_bits.push("leicht isoliert");
        }
        let mood = if mood_bits.is_empty() {
            "stabile Balance".to_string()
        } else {
            mood_bits.join(", ")
        };
        let actions = suggestions
            .iter()
            .map(|a| format!("{} ({})", a.label, a.duration))
            .collect::<Vec<_>>()
            .join(" / ");
        let reference = context.iter().take(2).cloned().collect::<Vec<_>>().join(" | ");
        format!(
            "Ich spüre {mood}. Vorschläge: {actions}. Kontext: {}",
            truncate_chars(&reference, CONTEXT_CHARS)
        )
    }

    /// Ask the enricher to rewrite `local`; keep `local` on any failure.
    fn enrich_reply(&self, user_text: &str, local: String) -> (String, Option<String>) {
        let Some(enricher) = self.enricher.as_ref().filter(|e| e.is_available()) else {
            return (local, None);
        };
        let system = system_instruction(&self.state);
        let prompt = format!("User: {user_text}\nKontext: {local}");
        let enriched = enricher.enrich(&system, &prompt);
        if is_diagnostic(&enriched) {
            warn!(diagnostic = %enriched, "Enrichment failed, keeping local reply");
            return (local, Some(enriched));
        }
        if enriched.trim().is_empty() {
            return (local, None);
        }
        (truncate_chars(&enriched, self.config.persona.reply_max_chars), None)
    }

    // ------------------------------------------------------------------
    // Action acceptance
    // ------------------------------------------------------------------

    /// Accept a suggestion by label, or reject the whole list with `None`.
    pub fn apply_action_result(&mut self, choice: Option<&str>) -> ActionOutcome {
        let Some(label) = choice.map(str::trim).filter(|l| !l.is_empty()) else {
            return self.reject();
        };
        let now = self.now();
        let mut outcome = ActionOutcome {
            accepted: Some(label.to_string()),
            ..ActionOutcome::default()
        };
        let xp_before = self.state.xp;

        self.state.xp += 1;
        self.state.record_habit(label);
        self.state.register_success();

        if let Some(spec) = self.catalogs.actions.find(label) {
            self.state.needs.apply_delta(&spec.need_effects);
            outcome.effects = spec.need_effects;
        }

        let normalized = normalize_label(label);
        for trigger in &self.catalogs.triggers {
            if normalized.contains(&trigger.keyword) {
                self.state.buffs.grant(&trigger.buff, trigger.turns);
                outcome.buffs_granted.push(trigger.buff.clone());
            }
        }
        if normalized == normalize_label(&research_action().label) {
            let level = self.state.skills.level_up(RESEARCH_SKILL);
            debug!(level, "Research skill trained");
        }

        let advance = self
            .state
            .advance_time(&self.catalogs.effects, self.config.persona.epoch_every_days, now);
        outcome.new_day = advance.new_day;
        outcome.epoch = advance.epoch;

        let completed = complete_objectives(&mut self.state.objectives, &self.state.needs);
        if completed > 0 {
            self.state.xp += completed * OBJECTIVE_XP;
            info!(completed, xp = self.state.xp, "Objectives completed");
        }
        outcome.objectives_completed = completed;

        for milestone in crossed_milestones(xp_before, self.state.xp) {
            let artifact = Artifact {
                epoch: self.state.epoch,
                title: format!("{milestone} XP erreicht"),
                effect: EFFECT_MILESTONE.to_string(),
                notes: format!("Tag {}, Serie {}", self.state.day, self.state.streak),
                created_at: now,
            };
            self.state.artifacts.push(artifact.clone());
            outcome.milestones.push(artifact);
        }

        outcome.achievements = self.check_achievements();
        info!(label, xp = self.state.xp, streak = self.state.streak, time = %self.state.time_block, "Action accepted");
        outcome
    }

    fn reject(&mut self) -> ActionOutcome {
        let rejections = self.state.register_rejection();
        if rejections >= REJECTION_LIMIT {
            self.state.debuffs.grant(OVERSTIMULATED, OVERSTIMULATED_TURNS);
            info!(rejections, "Persona overstimulated");
        }
        debug!(rejections, "Suggestions rejected");
        ActionOutcome::default()
    }

    fn check_achievements(&mut self) -> Vec<String> {
        let progress = Progress {
            xp: self.state.xp,
            discipline: self.state.stats.discipline,
            insight: self.state.stats.insight,
            habits: self.state.habit_counts.len(),
            epoch: self.state.epoch,
        };
        let unlocked = check_achievements(&mut self.state.achievements, &progress);
        for name in &unlocked {
            info!(achievement = %name, "Achievement unlocked");
        }
        unlocked
    }

    // ------------------------------------------------------------------
    // Autonomy
    // ------------------------------------------------------------------

    /// One autonomous world step without user input.
    pub fn idle_tick(&mut self) -> IdleReport {
        let now = self.now();
        self.state.world.tick += 1;
        let drift = self.state.world.need_drift.clone();
        self.state.needs.apply_delta(&drift);

        let mut report = IdleReport {
            tick: self.state.world.tick,
            ..IdleReport::default()
        };

        let biases: Vec<(String, f64)> = self
            .state
            .world
            .event_bias
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        for (key, bias) in biases {
            let p = if bias.is_finite() { bias.clamp(0.0, 1.0) } else { 0.0 };
            if self.rng.gen_bool(p) {
                self.apply_event(&key, now);
                report.event = Some(key);
                break;
            }
        }

        if self.state.time_block == TimeBlock::Night
            && !self.state.dreamed_tonight
            && !self.state.overmind.thought_mute
        {
            let top = self.state.top_preferences(1);
            let dream = overmind::compose_dream(
                &self.state.needs,
                top.first().map(String::as_str),
                self.state.day,
                now,
                self.config.persona.thought_max_len,
            );
            self.state.add_thought(dream.clone());
            self.state.dreamed_tonight = true;
            if self.rng.gen_bool(DREAM_INSIGHT_CHANCE) {
                let artifact = Artifact {
                    epoch: self.state.epoch,
                    title: format!("Einsicht aus Traum (Tag {})", self.state.day),
                    effect: EFFECT_INSIGHT.to_string(),
                    notes: dream.text.clone(),
                    created_at: now,
                };
                self.state.artifacts.push(artifact.clone());
                report.insight = Some(artifact);
            }
            debug!(day = self.state.day, insight = report.insight.is_some(), "Dream");
            report.dream = Some(dream);
        }

        debug!(tick = report.tick, event = ?report.event, "Idle tick");
        report
    }

    // ------------------------------------------------------------------
    // Epochs, world, skills
    // ------------------------------------------------------------------

    /// Advance one epoch now.
    pub fn advance_epoch(&mut self) -> EpochReport {
        let now = self.now();
        let report = epoch::advance_epoch(&mut self.state, now);
        self.check_achievements();
        report
    }

    /// Switch scenario.
    pub fn select_scenario(&mut self, scenario: &Scenario) {
        self.state.world.select(scenario);
        info!(scenario = %scenario.name, entities = scenario.entities.len(), "Scenario selected");
    }

    /// Hand the persona an item.
    pub fn give_item(&mut self, item: Item) {
        info!(item = %item.name, "Item received");
        self.state.items.push(item);
    }

    /// Unlock a skill defined by a loaded card.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LifesimError::UnknownSkill`] when no card has that name.
    pub fn unlock_skill(&mut self, name: &str) -> Result<bool> {
        self.state.skills.unlock_from_cards(name, &self.catalogs.skills)
    }

    /// Unlock every skill card whose self-tests pass.
    pub fn autounlock_skills(&mut self) -> AutounlockReport {
        self.state.skills.autounlock(&self.catalogs.skills)
    }

    /// Pin the knobs to fixed values, or release them with `None`.
    pub fn pin_knobs(&mut self, knobs: Option<RankingKnobs>) {
        match knobs {
            Some(k) => {
                let om = &mut self.state.overmind;
                om.intensity = k.intensity.clamp(1, 3);
                om.variety = k.variety.clamp(1, 3);
                om.suggestion_len = k.suggestion_len.clamp(1, 4);
                om.pinned = true;
            }
            None => self.state.overmind.pinned = false,
        }
    }

    /// Mute or unmute all thoughts.
    pub fn set_thought_mute(&mut self, mute: bool) {
        self.state.overmind.thought_mute = mute;
    }

    /// Markdown chronicle of the persona.
    #[must_use]
    pub fn export_chronicle(&self) -> String {
        render_chronicle(&self.state)
    }
}

/// The enrichment system instruction for `state`'s persona.
#[must_use]
pub fn system_instruction(state: &PersonaState) -> String {
    let voice = state.profile.voice_style.replace('-', ", ");
    format!(
        "Du bist {}, {voice}. Max 3 Sätze. Nutze Vorschläge nicht wörtlich wieder, sondern baue sie sinnvoll ein.",
        state.profile.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::needs::Need;
    use chrono::Duration;

    struct FixedEnricher(&'static str);

    impl Enricher for FixedEnricher {
        fn is_available(&self) -> bool {
            true
        }

        fn enrich(&self, _system: &str, _prompt: &str) -> String {
            self.0.to_string()
        }
    }

    fn engine() -> (LifeSimEngine, ManualClock) {
        let clock = ManualClock::default();
        let engine = LifeSimEngine::new(PersonaState::default(), LifesimConfig::default())
            .with_clock(Arc::new(clock.clone()))
            .with_seed(7);
        (engine, clock)
    }

    #[test]
    fn first_turn_shape() {
        let (mut engine, _clock) = engine();
        let reply = engine.persona_reply("Ich bin müde und unruhig", None);
        assert_eq!(engine.state().turn, 1);
        assert!(reply.reflection.is_none());
        assert!(!reply.actions.is_empty());
        assert!(reply.reply.starts_with("Ich spüre stabile Balance. Vorschläge: "));
        assert_eq!(reply.topic.as_deref(), Some("schlaf"));
        assert_eq!(engine.state().episodes.len(), 2);
        assert_eq!(engine.state().episodes[1].actor, Actor::Persona);
    }

    #[test]
    fn reflection_on_fifth_turn() {
        let (mut engine, _clock) = engine();
        for i in 1..=5 {
            let reply = engine.persona_reply("morgens brauche ich fokus", None);
            assert_eq!(reply.reflection.is_some(), i == 5);
        }
        let note = &engine.state().notes[0].text;
        assert!(note.starts_with("Reflexion: Ich achte auf "));
        assert!(note.contains("morgens"));
    }

    #[test]
    fn known_event_applies_and_logs() {
        let (mut engine, _clock) = engine();
        let reply = engine.persona_reply("Es regnet", Some("regen"));
        assert_eq!(reply.event_effects.get("calm"), Some(&5));
        assert_eq!(engine.state().needs.calm, 55);
        assert!(engine.state().episodes.iter().any(|e| e.actor == Actor::System && e.tags.contains(&"event".to_string())));

        let reply = engine.persona_reply("Nichts", Some("unbekannt"));
        assert!(reply.event_effects.is_empty());
    }

    #[test]
    fn ticker_respects_interval_and_mute() {
        let (mut engine, clock) = engine();
        // No user episode yet: nothing to summarise.
        assert!(engine.persona_reply("erste zeile", None).thought.is_none());
        // Fires now: never fired before.
        assert!(engine.persona_reply("zweite zeile", None).thought.is_some());
        // Same instant: interval not elapsed.
        assert!(engine.persona_reply("dritte zeile", None).thought.is_none());
        clock.advance(Duration::seconds(9));
        let thought = engine.persona_reply("vierte zeile", None).thought.expect("thought");
        assert!(thought.text.starts_with("Gedanke: "));

        engine.set_thought_mute(true);
        clock.advance(Duration::seconds(60));
        assert!(engine.persona_reply("fünfte zeile", None).thought.is_none());
    }

    #[test]
    fn enrichment_replaces_and_diagnostics_do_not() {
        let (engine, _clock) = engine();
        let mut engine = engine.with_enricher(Box::new(FixedEnricher("Kurz atmen, dann weiter.")));
        assert_eq!(engine.persona_reply("hallo", None).reply, "Kurz atmen, dann weiter.");

        let (engine, _clock) = self::engine();
        let mut engine = engine.with_enricher(Box::new(FixedEnricher("[LLM] Fehlgeschlagen nach 3 Versuchen: timeout")));
        let reply = engine.persona_reply("hallo", None);
        assert!(reply.reply.starts_with("Ich spüre"));
        assert!(reply.diagnostic.is_some());
    }

    #[test]
    fn accepting_breathing_grants_buff_and_advances_time() {
        let (mut engine, _clock) = engine();
        let outcome = engine.apply_action_result(Some("2-Min atemfokus"));
        let state = engine.state();
        assert_eq!(state.xp, 1);
        assert_eq!(state.streak, 1);
        assert_eq!(state.time_block, TimeBlock::Midday);
        assert_eq!(outcome.buffs_granted, vec!["klarer_kopf".to_string()]);
        // +3 from the action, +2 from the first buff tick.
        assert_eq!(state.needs.clarity, 55);
        assert_eq!(state.buffs.remaining("klarer_kopf"), Some(2));
        assert!(outcome.achievements.contains(&"first_step".to_string()));
    }

    #[test]
    fn three_rejections_overstimulate() {
        let (mut engine, _clock) = engine();
        engine.apply_action_result(None);
        engine.apply_action_result(Some("   "));
        assert!(!engine.state().debuffs.is_active(OVERSTIMULATED));
        engine.apply_action_result(None);
        assert!(engine.state().debuffs.is_active(OVERSTIMULATED));
        assert_eq!(engine.state().stats.resilience, 3);
        assert_eq!(engine.state().time_block, TimeBlock::Morning);
    }

    #[test]
    fn research_action_gated_by_skill_and_flag() {
        let (mut engine, _clock) = engine();
        engine.state_mut().web_research = true;
        assert!(engine.suggest_actions().iter().all(|a| a.label != "web research 3-2-1"));
        engine.state_mut().skills.unlock(RESEARCH_SKILL);
        let actions = engine.suggest_actions();
        assert_eq!(actions.last().map(|a| a.label.as_str()), Some("web research 3-2-1"));

        engine.apply_action_result(Some("web research 3-2-1"));
        assert_eq!(engine.state().skills.level(RESEARCH_SKILL), 2);
    }

    #[test]
    fn idle_tick_drifts_and_dreams_once_per_night() {
        let (mut engine, _clock) = engine();
        engine.select_scenario(&Scenario {
            name: "stadt".to_string(),
            need_drift: crate::needs::deltas(&[("energy", -1)]),
            event_bias: std::collections::BTreeMap::from([("regen".to_string(), 1.0)]),
            entities: Vec::new(),
        });
        let report = engine.idle_tick();
        assert_eq!(report.tick, 1);
        assert_eq!(report.event.as_deref(), Some("regen"));
        assert_eq!(engine.state().needs.energy, 49);
        assert!(report.dream.is_none());

        engine.state_mut().time_block = TimeBlock::Night;
        let report = engine.idle_tick();
        let dream = report.dream.expect("dream");
        assert!(dream.text.starts_with("Traum: "));
        assert!(engine.idle_tick().dream.is_none());
    }

    #[test]
    fn dream_insight_depends_on_the_draw() {
        let mut minted = 0;
        let mut plain = 0;
        for seed in 0..64 {
            let mut engine = LifeSimEngine::new(PersonaState::default(), LifesimConfig::default())
                .with_clock(Arc::new(ManualClock::default()))
                .with_seed(seed);
            engine.state_mut().time_block = TimeBlock::Night;
            let report = engine.idle_tick();
            assert!(report.dream.is_some());
            match report.insight {
                Some(artifact) => {
                    assert_eq!(artifact.effect, EFFECT_INSIGHT);
                    assert_eq!(engine.state().artifacts.len(), 1);
                    minted += 1;
                }
                None => {
                    assert!(engine.state().artifacts.is_empty());
                    plain += 1;
                }
            }
        }
        assert!(minted > 0, "no seed minted an insight");
        assert!(plain > minted, "insight should be the rarer outcome");
    }

    #[test]
    fn epochs_and_items_through_engine() {
        let (mut engine, _clock) = engine();
        engine.give_item(Item {
            name: "Kompass".to_string(),
            ..Item::default()
        });
        let report = engine.advance_epoch();
        assert_eq!(report.epoch, 1);
        assert_eq!(engine.state().items.len(), 1);
        assert!(engine.export_chronicle().contains("Epoch 1 Rückblick"));
    }

    #[test]
    fn unknown_skill_is_reported() {
        let (mut engine, _clock) = engine();
        assert!(engine.unlock_skill("fliegen").is_err());
        assert!(engine.autounlock_skills().unlocked.is_empty());
    }

    #[test]
    fn pinned_knobs_survive_turns() {
        let (mut engine, _clock) = engine();
        engine.pin_knobs(Some(RankingKnobs {
            intensity: 1,
            variety: 2,
            suggestion_len: 1,
        }));
        engine.state_mut().needs.set(Need::Energy, 90);
        let reply = engine.persona_reply("los", None);
        assert_eq!(reply.knobs.intensity, 1);
        assert_eq!(reply.actions.len(), 1);
        engine.pin_knobs(None);
        assert_eq!(engine.persona_reply("los", None).knobs.suggestion_len, 2);
    }

    #[test]
    fn system_instruction_uses_profile() {
        let state = PersonaState::default();
        assert!(system_instruction(&state).starts_with("Du bist Ari, kurz, konkret, warm. Max 3 Sätze."));
    }
}
