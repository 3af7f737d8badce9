//! Epochs and the life-phase state machine.
//!
//! An epoch is a checkpoint: it mints a summary artifact, compresses the
//! episode log, and gives the life phase a chance to advance.
//!
//! ```text
//! phase_1 ──(epoch ≥ 2 ∨ xp ≥ 40)──▶ phase_2 ──(epoch ≥ 4 ∨ xp ≥ 120)──▶ phase_3
//!         ──(epoch ≥ 6 ∨ xp ≥ 250)──▶ phase_4
//! ```
//!
//! Phases never regress. Several phases may be passed in one advance; each
//! step is recorded separately in the phase history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::memory::artifact::EFFECT_SUMMARY;
use crate::memory::{Artifact, compress_episodes};
use crate::state::PersonaState;
use crate::types::LifePhase;

/// One recorded phase change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Phase left.
    pub from: LifePhase,
    /// Phase entered.
    pub to: LifePhase,
    /// Epoch at which it happened.
    pub epoch: u32,
    /// XP at that time.
    pub xp: u32,
    /// When.
    pub at: DateTime<Utc>,
}

/// Minimum epoch or xp needed to enter `phase`.
#[must_use]
pub fn phase_requirement(phase: LifePhase) -> (u32, u32) {
    match phase {
        LifePhase::Phase1 => (0, 0),
        LifePhase::Phase2 => (2, 40),
        LifePhase::Phase3 => (4, 120),
        LifePhase::Phase4 => (6, 250),
    }
}

/// Whether `phase` is reachable at this epoch and xp.
#[must_use]
pub fn phase_reached(phase: LifePhase, epoch: u32, xp: u32) -> bool {
    let (min_epoch, min_xp) = phase_requirement(phase);
    epoch >= min_epoch || xp >= min_xp
}

/// What an epoch advance did.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    /// The new epoch number.
    pub epoch: u32,
    /// The summary artifact minted.
    pub artifact: Artifact,
    /// Episodes dropped by compression.
    pub compressed: usize,
    /// Phase steps taken, in order.
    pub transitions: Vec<PhaseTransition>,
}

/// Advance `state` by exactly one epoch.
pub fn advance_epoch(state: &mut PersonaState, now: DateTime<Utc>) -> EpochReport {
    state.epoch += 1;
    let epoch = state.epoch;

    let prefs = state.preferences.top(3);
    let habits = state.habit_counts.top(3);
    let notes = format!(
        "Präferenzen: {}; Gewohnheiten: {}; Episoden: {}",
        join_or_none(&prefs),
        join_or_none(&habits),
        state.episodes.len()
    );
    let artifact = Artifact {
        epoch,
        title: format!("Epoch {epoch} Rückblick"),
        effect: EFFECT_SUMMARY.to_string(),
        notes,
        created_at: now,
    };
    state.artifacts.push(artifact.clone());

    let compressed = compress_episodes(&mut state.episodes, state.max_episode_history);

    let mut transitions = Vec::new();
    while let Some(next) = state.life_phase.next() {
        if !phase_reached(next, epoch, state.xp) {
            break;
        }
        let transition = PhaseTransition {
            from: state.life_phase,
            to: next,
            epoch,
            xp: state.xp,
            at: now,
        };
        info!(from = %transition.from, to = %transition.to, epoch, xp = state.xp, "Life phase advanced");
        state.life_phase = next;
        state.phase_history.push(transition.clone());
        transitions.push(transition);
    }

    info!(epoch, compressed, episodes = state.episodes.len(), "Epoch advanced");

    EpochReport {
        epoch,
        artifact,
        compressed,
        transitions,
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(noch keine)".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Episode;
    use crate::types::Actor;

    #[test]
    fn first_epoch_titles_and_compresses() {
        let mut state = PersonaState::default();
        state.max_episode_history = 10;
        let now = Utc::now();
        for i in 0..25 {
            state.episodes.push(Episode::new(Actor::User, format!("zeile {i}"), now));
        }
        let report = advance_epoch(&mut state, now);
        assert_eq!(report.epoch, 1);
        assert!(report.artifact.title.contains("Epoch 1"));
        assert!(report.artifact.notes.contains("Episoden: 25"));
        assert_eq!(report.compressed, 15);
        assert_eq!(state.episodes.len(), 10);
        assert_eq!(state.artifacts.len(), 1);
        assert!(report.transitions.is_empty());
    }

    #[test]
    fn phases_advance_by_epoch() {
        let mut state = PersonaState::default();
        let now = Utc::now();
        advance_epoch(&mut state, now);
        assert_eq!(state.life_phase, LifePhase::Phase1);
        advance_epoch(&mut state, now);
        assert_eq!(state.life_phase, LifePhase::Phase2);
        assert_eq!(state.phase_history.len(), 1);
    }

    #[test]
    fn xp_can_cascade_several_phases() {
        let mut state = PersonaState::default();
        state.xp = 130;
        let report = advance_epoch(&mut state, Utc::now());
        assert_eq!(state.life_phase, LifePhase::Phase3);
        assert_eq!(report.transitions.len(), 2);
        assert_eq!(report.transitions[0].to, LifePhase::Phase2);
        assert_eq!(report.transitions[1].from, LifePhase::Phase2);
    }

    #[test]
    fn final_phase_is_terminal() {
        let mut state = PersonaState::default();
        state.xp = 1000;
        advance_epoch(&mut state, Utc::now());
        assert_eq!(state.life_phase, LifePhase::Phase4);
        let report = advance_epoch(&mut state, Utc::now());
        assert!(report.transitions.is_empty());
        assert_eq!(state.phase_history.len(), 3);
    }
}
