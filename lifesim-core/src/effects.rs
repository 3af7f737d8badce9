//! Buffs and debuffs — named, turn-limited recurring need modifiers.
//!
//! Names are data, not code: what a name does is looked up in an
//! [`EffectTable`], so packs can add effects without touching the engine.
//! Counters tick once per time-block advance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::needs::{NeedDeltas, NeedState, deltas};

/// Structural category of a status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Beneficial.
    Buff,
    /// Harmful.
    Debuff,
}

/// Remaining advances per active effect name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusLedger(pub BTreeMap<String, u32>);

impl StatusLedger {
    /// Create or refresh `name`; an existing longer countdown is kept.
    pub fn grant(&mut self, name: &str, turns: u32) {
        if turns == 0 {
            return;
        }
        let remaining = self.0.entry(name.to_string()).or_insert(0);
        *remaining = (*remaining).max(turns);
    }

    /// Decrement every counter by one and drop the expired ones.
    pub fn countdown(&mut self) -> Vec<String> {
        let mut expired = Vec::new();
        for (name, remaining) in &mut self.0 {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                expired.push(name.clone());
            }
        }
        for name in &expired {
            self.0.remove(name);
        }
        expired
    }

    /// Whether `name` is active.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remaining advances for `name`.
    #[must_use]
    pub fn remaining(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }

    /// Active effect names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether nothing is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-tick need delta of each known effect name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectTable {
    /// Buff name → per-tick delta.
    #[serde(default)]
    pub buffs: BTreeMap<String, NeedDeltas>,
    /// Debuff name → per-tick delta.
    #[serde(default)]
    pub debuffs: BTreeMap<String, NeedDeltas>,
}

impl EffectTable {
    /// The built-in effect library.
    #[must_use]
    pub fn builtin() -> Self {
        let mut buffs = BTreeMap::new();
        buffs.insert("klarer_kopf".to_string(), deltas(&[("clarity", 2)]));
        buffs.insert("ordnung_plus".to_string(), deltas(&[("order", 2)]));
        let mut debuffs = BTreeMap::new();
        debuffs.insert(
            "überreizt".to_string(),
            deltas(&[("creativity", -2), ("calm", -2)]),
        );
        Self { buffs, debuffs }
    }

    /// Delta for `name` under `kind`, if the table knows it.
    #[must_use]
    pub fn lookup(&self, kind: EffectKind, name: &str) -> Option<&NeedDeltas> {
        match kind {
            EffectKind::Buff => self.buffs.get(name),
            EffectKind::Debuff => self.debuffs.get(name),
        }
    }

    /// One advance: apply every active effect's delta, then count down.
    ///
    /// Unknown names still count down but change nothing.
    pub fn tick(&self, needs: &mut NeedState, buffs: &mut StatusLedger, debuffs: &mut StatusLedger) {
        for (kind, ledger) in [(EffectKind::Buff, &*buffs), (EffectKind::Debuff, &*debuffs)] {
            for name in ledger.names() {
                if let Some(delta) = self.lookup(kind, name) {
                    needs.apply_delta(delta);
                }
            }
        }
        let expired_buffs = buffs.countdown();
        let expired_debuffs = debuffs.countdown();
        if !expired_buffs.is_empty() || !expired_debuffs.is_empty() {
            debug!(?expired_buffs, ?expired_debuffs, "Status effects expired");
        }
    }
}

/// Grants a buff when an accepted action label contains a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffTrigger {
    /// Substring matched against the normalized label.
    pub keyword: String,
    /// Buff to grant.
    pub buff: String,
    /// Countdown to grant.
    pub turns: u32,
}

/// The built-in trigger table.
#[must_use]
pub fn builtin_triggers() -> Vec<BuffTrigger> {
    vec![
        BuffTrigger {
            keyword: "atem".to_string(),
            buff: "klarer_kopf".to_string(),
            turns: 3,
        },
        BuffTrigger {
            keyword: "ordnung".to_string(),
            buff: "ordnung_plus".to_string(),
            turns: 3,
        },
    ]
}

/// Debuff set after too many consecutive rejections.
pub const OVERSTIMULATED: &str = "überreizt";
