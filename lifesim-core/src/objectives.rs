//! Daily objectives and achievements.
//!
//! Objectives are regenerated once per day from the two lowest needs; an
//! objective is done once its need reaches the target. Achievements are
//! one-shot flags evaluated against cumulative stats.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::needs::{NEED_MAX, Need, NeedState};

/// How far above the current value a daily target is set.
pub const OBJECTIVE_LIFT: i32 = 8;
/// Number of needs targeted per day.
pub const OBJECTIVES_PER_DAY: usize = 2;
/// XP granted per completed objective.
pub const OBJECTIVE_XP: u32 = 2;
/// XP levels that mint a milestone artifact.
pub const XP_MILESTONES: [u32; 5] = [10, 25, 50, 100, 250];

/// Raise one need to a target today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyObjective {
    /// Targeted need.
    pub need: Need,
    /// Value when the objective was set.
    pub baseline: i32,
    /// Value to reach.
    pub target: i32,
    /// Whether the target was reached.
    #[serde(default)]
    pub done: bool,
}

/// Objectives for the two currently lowest needs.
#[must_use]
pub fn generate_objectives(needs: &NeedState) -> Vec<DailyObjective> {
    needs
        .lowest(OBJECTIVES_PER_DAY)
        .into_iter()
        .map(|need| {
            let baseline = needs.get(need);
            DailyObjective {
                need,
                baseline,
                target: (baseline + OBJECTIVE_LIFT).min(NEED_MAX),
                done: false,
            }
        })
        .collect()
}

/// Mark reached objectives as done; returns how many flipped just now.
pub fn complete_objectives(objectives: &mut [DailyObjective], needs: &NeedState) -> u32 {
    let mut newly_done = 0;
    for objective in objectives.iter_mut().filter(|o| !o.done) {
        if needs.get(objective.need) >= objective.target {
            objective.done = true;
            newly_done += 1;
        }
    }
    newly_done
}

/// Stats the achievement rules read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Total xp.
    pub xp: u32,
    /// Longest success streak.
    pub discipline: u32,
    /// Focus thoughts so far.
    pub insight: u32,
    /// Distinct habits.
    pub habits: usize,
    /// Current epoch.
    pub epoch: u32,
}

/// Achievement rules, checked in this order.
pub const ACHIEVEMENTS: [(&str, fn(&Progress) -> bool); 6] = [
    ("first_step", |p| p.xp >= 1),
    ("streak_3", |p| p.discipline >= 3),
    ("routine", |p| p.discipline >= 7),
    ("explorer", |p| p.habits >= 5),
    ("thinker", |p| p.insight >= 3),
    ("seasoned", |p| p.epoch >= 3),
];

/// Unlock every achievement whose rule now holds; returns the new ones.
pub fn check_achievements(unlocked: &mut BTreeSet<String>, progress: &Progress) -> Vec<String> {
    let mut fresh = Vec::new();
    for (name, rule) in &ACHIEVEMENTS {
        if !unlocked.contains(*name) && rule(progress) {
            unlocked.insert((*name).to_string());
            fresh.push((*name).to_string());
        }
    }
    fresh
}

/// Milestones crossed when xp moved from `before` to `after`.
#[must_use]
pub fn crossed_milestones(before: u32, after: u32) -> Vec<u32> {
    XP_MILESTONES
        .into_iter()
        .filter(|m| before < *m && after >= *m)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objectives_target_two_lowest_needs() {
        let mut needs = NeedState::default();
        needs.set(Need::Energy, 30);
        needs.set(Need::Order, 96);
        needs.set(Need::Calm, 20);
        let objectives = generate_objectives(&needs);
        assert_eq!(objectives.len(), 2);
        assert_eq!(objectives[0].need, Need::Calm);
        assert_eq!(objectives[0].target, 28);
        assert_eq!(objectives[1].need, Need::Energy);
    }

    #[test]
    fn target_is_capped() {
        let needs = NeedState::uniform(97);
        assert!(generate_objectives(&needs).iter().all(|o| o.target == NEED_MAX));
    }

    #[test]
    fn completion_counts_only_new() {
        let mut needs = NeedState::default();
        let mut objectives = generate_objectives(&needs);
        assert_eq!(complete_objectives(&mut objectives, &needs), 0);
        needs = NeedState::uniform(60);
        assert_eq!(complete_objectives(&mut objectives, &needs), 2);
        assert_eq!(complete_objectives(&mut objectives, &needs), 0);
    }

    #[test]
    fn achievements_unlock_once() {
        let mut unlocked = BTreeSet::new();
        let progress = Progress {
            xp: 1,
            discipline: 3,
            ..Progress::default()
        };
        let new = check_achievements(&mut unlocked, &progress);
        assert_eq!(new, vec!["first_step".to_string(), "streak_3".to_string()]);
        assert!(check_achievements(&mut unlocked, &progress).is_empty());
    }

    #[test]
    fn already_unlocked_are_skipped() {
        let mut unlocked = BTreeSet::from(["first_step".to_string()]);
        let progress = Progress {
            xp: 5,
            epoch: 3,
            ..Progress::default()
        };
        assert_eq!(check_achievements(&mut unlocked, &progress), vec!["seasoned".to_string()]);
        assert_eq!(unlocked.len(), 2);
    }

    #[test]
    fn milestones_between() {
        assert_eq!(crossed_milestones(9, 11), vec![10]);
        assert_eq!(crossed_milestones(10, 11), Vec::<u32>::new());
        assert_eq!(crossed_milestones(0, 60), vec![10, 25, 50]);
    }
}
