//! Skill cards, their self-tests, and the persona's unlocked skill book.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LifesimError, Result};

/// One self-test of a skill card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTest {
    /// Sample input.
    pub input: String,
    /// Substring the input must contain (case-insensitive).
    pub expect_sub: String,
}

/// A skill definition as shipped in the skill directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCard {
    /// Unique skill name.
    pub name: String,
    /// Human description.
    #[serde(default)]
    pub description: String,
    /// Self-tests gating auto-unlock.
    #[serde(default)]
    pub tests: Vec<SkillTest>,
}

/// Outcome of one self-test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTestOutcome {
    /// Whether it passed.
    pub passed: bool,
    /// Human-readable result line.
    pub line: String,
}

/// Run every self-test of `card`.
#[must_use]
pub fn run_skill_tests(card: &SkillCard) -> Vec<SkillTestOutcome> {
    card.tests
        .iter()
        .map(|test| {
            let passed = test.input.to_lowercase().contains(&test.expect_sub.to_lowercase());
            let status = if passed { "PASS" } else { "FAIL" };
            SkillTestOutcome {
                passed,
                line: format!(
                    "{status} {}: expect '{}' in '{}'",
                    card.name, test.expect_sub, test.input
                ),
            }
        })
        .collect()
}

/// Result of an auto-unlock pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutounlockReport {
    /// Newly unlocked skills.
    pub unlocked: Vec<String>,
    /// Skills with at least one failing test.
    pub failed: Vec<String>,
}

/// Unlocked skills and their levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBook {
    /// Unlocked skill names.
    #[serde(default)]
    pub unlocked: BTreeSet<String>,
    /// Skill name → level.
    #[serde(default)]
    pub levels: BTreeMap<String, u32>,
}

impl SkillBook {
    /// Unlock `name`; returns whether it was new. Level becomes at least 1.
    pub fn unlock(&mut self, name: &str) -> bool {
        let level = self.levels.entry(name.to_string()).or_insert(0);
        *level = (*level).max(1);
        let fresh = self.unlocked.insert(name.to_string());
        if fresh {
            info!(skill = name, "Skill unlocked");
        }
        fresh
    }

    /// Unlock a skill that must exist in `cards`.
    ///
    /// # Errors
    ///
    /// Returns [`LifesimError::UnknownSkill`] when no card has that name.
    pub fn unlock_from_cards(&mut self, name: &str, cards: &BTreeMap<String, SkillCard>) -> Result<bool> {
        if !cards.contains_key(name) {
            return Err(LifesimError::UnknownSkill(name.to_string()));
        }
        Ok(self.unlock(name))
    }

    /// Whether `name` is unlocked.
    #[must_use]
    pub fn is_unlocked(&self, name: &str) -> bool {
        self.unlocked.contains(name)
    }

    /// Current level of `name` (0 when unknown).
    #[must_use]
    pub fn level(&self, name: &str) -> u32 {
        self.levels.get(name).copied().unwrap_or(0)
    }

    /// Raise `name` by one level.
    pub fn level_up(&mut self, name: &str) -> u32 {
        let level = self.levels.entry(name.to_string()).or_insert(0);
        *level += 1;
        *level
    }

    /// Unlock every locked card whose tests all pass.
    pub fn autounlock(&mut self, cards: &BTreeMap<String, SkillCard>) -> AutounlockReport {
        let mut report = AutounlockReport::default();
        for card in cards.values() {
            if self.is_unlocked(&card.name) {
                continue;
            }
            if run_skill_tests(card).iter().all(|o| o.passed) {
                if self.unlock(&card.name) {
                    report.unlocked.push(card.name.clone());
                }
            } else {
                report.failed.push(card.name.clone());
            }
        }
        report
    }
}
