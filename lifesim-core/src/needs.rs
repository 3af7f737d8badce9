//! The six bounded wellbeing needs.
//!
//! Every need lives in `[0, 100]`; every mutation clamps. Needs are addressed
//! by the [`Need`] enum, and string keys coming from catalogs are resolved
//! through [`Need::from_key`] (unknown keys are ignored, never an error).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Signed per-need deltas keyed by need name, as found in catalogs and tables.
pub type NeedDeltas = BTreeMap<String, i32>;

/// Lower bound of every need.
pub const NEED_MIN: i32 = 0;
/// Upper bound of every need.
pub const NEED_MAX: i32 = 100;
/// Homeostatic set-point.
pub const NEED_MID: i32 = 50;

/// One of the six needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Need {
    /// Physical energy.
    Energy,
    /// Mental clarity.
    Clarity,
    /// Social connection.
    Connection,
    /// Sense of order.
    Order,
    /// Creative flow.
    Creativity,
    /// Calm.
    Calm,
}

impl Need {
    /// All needs in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Energy,
        Self::Clarity,
        Self::Connection,
        Self::Order,
        Self::Creativity,
        Self::Calm,
    ];

    /// Snapshot / catalog key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Clarity => "clarity",
            Self::Connection => "connection",
            Self::Order => "order",
            Self::Creativity => "creativity",
            Self::Calm => "calm",
        }
    }

    /// Resolve a catalog key. Unknown keys yield `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.key() == key)
    }
}

impl fmt::Display for Need {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The six need levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedState {
    /// Physical energy.
    pub energy: i32,
    /// Mental clarity.
    pub clarity: i32,
    /// Social connection.
    pub connection: i32,
    /// Sense of order.
    pub order: i32,
    /// Creative flow.
    pub creativity: i32,
    /// Calm.
    pub calm: i32,
}

impl Default for NeedState {
    fn default() -> Self {
        Self::uniform(NEED_MID)
    }
}

impl NeedState {
    /// All six needs at `value` (clamped).
    #[must_use]
    pub fn uniform(value: i32) -> Self {
        let v = value.clamp(NEED_MIN, NEED_MAX);
        Self {
            energy: v,
            clarity: v,
            connection: v,
            order: v,
            creativity: v,
            calm: v,
        }
    }

    /// Current level of `need`.
    #[must_use]
    pub fn get(&self, need: Need) -> i32 {
        match need {
            Need::Energy => self.energy,
            Need::Clarity => self.clarity,
            Need::Connection => self.connection,
            Need::Order => self.order,
            Need::Creativity => self.creativity,
            Need::Calm => self.calm,
        }
    }

    fn slot(&mut self, need: Need) -> &mut i32 {
        match need {
            Need::Energy => &mut self.energy,
            Need::Clarity => &mut self.clarity,
            Need::Connection => &mut self.connection,
            Need::Order => &mut self.order,
            Need::Creativity => &mut self.creativity,
            Need::Calm => &mut self.calm,
        }
    }

    /// Set `need` to `value`, clamped into range.
    pub fn set(&mut self, need: Need, value: i32) {
        *self.slot(need) = value.clamp(NEED_MIN, NEED_MAX);
    }

    /// Add a signed delta to one need, clamping the result.
    pub fn adjust(&mut self, need: Need, delta: i32) {
        let slot = self.slot(need);
        *slot = slot.saturating_add(delta).clamp(NEED_MIN, NEED_MAX);
    }

    /// Apply named deltas. Unknown keys are ignored.
    pub fn apply_delta(&mut self, deltas: &NeedDeltas) {
        for (key, delta) in deltas {
            if let Some(need) = Need::from_key(key) {
                self.adjust(need, *delta);
            }
        }
    }

    /// Pull every need at most `amount` toward the mid-point, never past it.
    pub fn decay_towards_mid(&mut self, amount: i32) {
        let amount = amount.max(0);
        for need in Need::ALL {
            let slot = self.slot(need);
            if *slot > NEED_MID {
                *slot = slot.saturating_sub(amount).max(NEED_MID);
            } else if *slot < NEED_MID {
                *slot = slot.saturating_add(amount).min(NEED_MID);
            }
        }
    }

    /// The `n` lowest needs, ties kept in canonical order.
    #[must_use]
    pub fn lowest(&self, n: usize) -> Vec<Need> {
        let mut needs = Need::ALL.to_vec();
        needs.sort_by_key(|need| self.get(*need));
        needs.truncate(n);
        needs
    }

    /// Named view, for reply payloads and the chronicle.
    #[must_use]
    pub fn as_map(&self) -> BTreeMap<&'static str, i32> {
        Need::ALL.into_iter().map(|n| (n.key(), self.get(n))).collect()
    }
}

/// Build a [`NeedDeltas`] table from literal pairs.
#[must_use]
pub fn deltas(pairs: &[(&str, i32)]) -> NeedDeltas {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}
