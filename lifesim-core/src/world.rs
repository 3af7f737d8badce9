//! The persona's small world: scenario, entities, and held items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effects::StatusLedger;
use crate::needs::{NeedDeltas, NeedState};

/// Scenario id used before any scenario is selected.
pub const DEFAULT_SCENARIO: &str = "alltag";

/// Structural kind of a world entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A location.
    Place,
    /// A single person.
    Person,
    /// A group of people.
    Group,
}

/// A place, person or group with free-form attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEntity {
    /// Kind.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    /// Free-form attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Current scenario, tick counter and entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Active scenario id.
    pub scenario: String,
    /// Monotonic idle-tick counter.
    #[serde(default)]
    pub tick: u64,
    /// Known entities.
    #[serde(default)]
    pub entities: Vec<WorldEntity>,
    /// Per-tick need drift of the active scenario.
    #[serde(default)]
    pub need_drift: NeedDeltas,
    /// Event key → per-tick firing probability.
    #[serde(default)]
    pub event_bias: BTreeMap<String, f64>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            scenario: DEFAULT_SCENARIO.to_string(),
            tick: 0,
            entities: Vec::new(),
            need_drift: NeedDeltas::new(),
            event_bias: BTreeMap::new(),
        }
    }
}

impl WorldState {
    /// Switch to `scenario`, replacing entities and weighting. The tick keeps counting.
    pub fn select(&mut self, scenario: &Scenario) {
        self.scenario.clone_from(&scenario.name);
        self.entities.clone_from(&scenario.entities);
        self.need_drift.clone_from(&scenario.need_drift);
        self.event_bias.clone_from(&scenario.event_bias);
    }
}

/// A scenario document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario id.
    pub name: String,
    /// Need deltas applied on each idle tick.
    #[serde(default)]
    pub need_drift: NeedDeltas,
    /// Event key → probability of firing on an idle tick.
    #[serde(default)]
    pub event_bias: BTreeMap<String, f64>,
    /// Entities placed into the world on selection.
    #[serde(default)]
    pub entities: Vec<WorldEntity>,
}

/// A held item, applied once per day rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item name.
    pub name: String,
    /// Buff name → refresh duration.
    #[serde(default)]
    pub buffs: BTreeMap<String, u32>,
    /// Passive need delta per day.
    #[serde(default)]
    pub passive: NeedDeltas,
}

impl Item {
    /// Apply passive deltas and refresh buffs.
    pub fn apply(&self, needs: &mut NeedState, buffs: &mut StatusLedger) {
        needs.apply_delta(&self.passive);
        for (name, turns) in &self.buffs {
            buffs.grant(name, *turns);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::needs::deltas;

    #[test]
    fn selecting_a_scenario_replaces_entities() {
        let mut world = WorldState::default();
        world.tick = 4;
        let scenario = Scenario {
            name: "stadt".to_string(),
            need_drift: deltas(&[("energy", -1)]),
            event_bias: BTreeMap::from([("regen".to_string(), 0.3)]),
            entities: vec![WorldEntity {
                kind: EntityKind::Place,
                name: "Café".to_string(),
                attributes: BTreeMap::new(),
            }],
        };
        world.select(&scenario);
        assert_eq!(world.scenario, "stadt");
        assert_eq!(world.entities.len(), 1);
        assert_eq!(world.tick, 4);
        assert_eq!(world.event_bias.get("regen"), Some(&0.3));
    }

    #[test]
    fn item_applies_passive_and_buffs() {
        let item = Item {
            name: "Tee".to_string(),
            buffs: BTreeMap::from([("klarer_kopf".to_string(), 2)]),
            passive: deltas(&[("calm", 3)]),
        };
        let mut needs = NeedState::default();
        let mut buffs = StatusLedger::default();
        item.apply(&mut needs, &mut buffs);
        assert_eq!(needs.calm, 53);
        assert_eq!(buffs.remaining("klarer_kopf"), Some(2));
    }

    #[test]
    fn item_parses_with_missing_maps() {
        let item: Item = serde_json::from_str(r#"{"name":"Stein"}"#).expect("parse");
        assert!(item.buffs.is_empty());
        assert!(item.passive.is_empty());
    }
}
