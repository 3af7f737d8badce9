//! Read-only data collaborators: action, event, scenario, item and skill files.
//!
//! Every loader is total. A missing file yields an empty default silently; a
//! file that exists but cannot be read or parsed yields the same default and
//! a `warn!`. Nothing here ever fails the caller.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::actions::ActionCatalog;
use crate::config::PathsConfig;
use crate::effects::{BuffTrigger, EffectTable, builtin_triggers};
use crate::needs::{NeedDeltas, deltas};
use crate::skills::SkillCard;
use crate::world::{Item, Scenario};

/// Default item pack file name inside the item directory.
pub const STARTER_PACK: &str = "starter_pack.json";

/// Read and parse a JSON document; `None` on any failure.
fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        debug!(path = %path.display(), "Collaborator file absent, using default");
        return None;
    }
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read collaborator file");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed collaborator file, using default");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Load the action catalog; empty when missing or unreadable.
#[must_use]
pub fn load_actions(path: &Path) -> ActionCatalog {
    read_json(path).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One external event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    /// Event key.
    pub key: String,
    /// Need deltas applied when the event happens.
    #[serde(default)]
    pub need_effects: NeedDeltas,
}

/// Event key → effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCatalog(pub BTreeMap<String, EventSpec>);

impl EventCatalog {
    /// The events known without any data file.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_specs(vec![
            EventSpec {
                key: "regen".to_string(),
                need_effects: deltas(&[("calm", 5), ("creativity", 3)]),
            },
            EventSpec {
                key: "freund_absage".to_string(),
                need_effects: deltas(&[("connection", -6), ("calm", -4)]),
            },
            EventSpec {
                key: "idee_fund".to_string(),
                need_effects: deltas(&[("creativity", 8), ("clarity", 4)]),
            },
        ])
    }

    /// Index a list of specs by key; later duplicates win.
    #[must_use]
    pub fn from_specs(specs: Vec<EventSpec>) -> Self {
        Self(specs.into_iter().map(|spec| (spec.key.clone(), spec)).collect())
    }

    /// Effects of `key`, if known.
    #[must_use]
    pub fn effects(&self, key: &str) -> Option<&NeedDeltas> {
        self.0.get(key).map(|spec| &spec.need_effects)
    }
}

/// Load the event catalog (a JSON list of [`EventSpec`]); empty when missing.
#[must_use]
pub fn load_events(path: &Path) -> EventCatalog {
    read_json::<Vec<EventSpec>>(path).map_or_else(EventCatalog::default, EventCatalog::from_specs)
}

// ---------------------------------------------------------------------------
// Scenarios, items, skills
// ---------------------------------------------------------------------------

/// Load `<dir>/<name>.json`; an inert scenario of that name when missing.
#[must_use]
pub fn load_scenario(dir: &Path, name: &str) -> Scenario {
    read_json(&dir.join(format!("{name}.json"))).unwrap_or_else(|| Scenario {
        name: name.to_string(),
        ..Scenario::default()
    })
}

/// Load an item pack (a JSON list of [`Item`]); empty when missing.
#[must_use]
pub fn load_items(dir: &Path, file: &str) -> Vec<Item> {
    read_json(&dir.join(file)).unwrap_or_default()
}

/// Load every `*.json` skill card in `dir`, keyed by name. Bad files are skipped.
#[must_use]
pub fn load_skill_cards(dir: &Path) -> BTreeMap<String, SkillCard> {
    let mut cards = BTreeMap::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "No skill directory");
            return cards;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(card) = read_json::<SkillCard>(&path) {
            cards.insert(card.name.clone(), card);
        }
    }
    cards
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Everything the engine reads but never writes.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    /// Candidate actions.
    pub actions: ActionCatalog,
    /// External events.
    pub events: EventCatalog,
    /// Buff and debuff deltas.
    pub effects: EffectTable,
    /// Label keyword → buff grants.
    pub triggers: Vec<BuffTrigger>,
    /// Skill cards by name.
    pub skills: BTreeMap<String, SkillCard>,
}

impl Catalogs {
    /// Built-in tables, no files involved.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            actions: ActionCatalog::builtin(),
            events: EventCatalog::builtin(),
            effects: EffectTable::builtin(),
            triggers: builtin_triggers(),
            skills: BTreeMap::new(),
        }
    }

    /// Load action, event and skill files from `paths`.
    ///
    /// Effect and trigger tables are always the built-in ones. Built-in events
    /// stay known unless the event file redefines them.
    #[must_use]
    pub fn load(paths: &PathsConfig) -> Self {
        let mut events = EventCatalog::builtin();
        events.0.extend(load_events(&paths.events).0);
        Self {
            actions: load_actions(&paths.actions),
            events,
            effects: EffectTable::builtin(),
            triggers: builtin_triggers(),
            skills: load_skill_cards(&paths.skills),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_degrade_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_actions(&dir.path().join("nope.json")).is_empty());
        assert!(load_events(&dir.path().join("nope.json")).0.is_empty());
        assert!(load_items(dir.path(), STARTER_PACK).is_empty());
        assert!(load_skill_cards(&dir.path().join("skills")).is_empty());
        let scenario = load_scenario(dir.path(), "strand");
        assert_eq!(scenario.name, "strand");
        assert!(scenario.need_drift.is_empty());
    }

    #[test]
    fn malformed_file_degrades_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, b"{ not json").expect("write");
        assert!(load_actions(&path).is_empty());
    }

    #[test]
    fn actions_and_events_parse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let actions = dir.path().join("actions.json");
        std::fs::write(
            &actions,
            br#"[{"label":"tee kochen","duration":"5-Min","need_effects":{"calm":3},"weight":1.0}]"#,
        )
        .expect("write");
        let catalog = load_actions(&actions);
        assert_eq!(catalog.0.len(), 1);
        assert_eq!(catalog.0[0].need_effects.get("calm"), Some(&3));

        let events = dir.path().join("events.json");
        std::fs::write(&events, br#"[{"key":"sonne","need_effects":{"energy":4}}]"#).expect("write");
        let catalog = load_events(&events);
        assert_eq!(catalog.effects("sonne").and_then(|e| e.get("energy")), Some(&4));
        assert!(catalog.effects("regen").is_none());
    }

    #[test]
    fn skill_directory_skips_bad_cards() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("a.json"),
            br#"{"name":"notiz","tests":[{"input":"notiz","expect_sub":"not"}]}"#,
        )
        .expect("write");
        std::fs::write(dir.path().join("b.json"), b"kaputt").expect("write");
        std::fs::write(dir.path().join("c.txt"), b"ignored").expect("write");
        let cards = load_skill_cards(dir.path());
        assert_eq!(cards.len(), 1);
        assert!(cards.contains_key("notiz"));
    }

    #[test]
    fn bundle_load_keeps_builtin_events() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = PathsConfig {
            actions: dir.path().join("a.json"),
            events: dir.path().join("e.json"),
            skills: dir.path().join("skills"),
            ..PathsConfig::default()
        };
        let catalogs = Catalogs::load(&paths);
        assert!(catalogs.actions.is_empty());
        assert!(catalogs.events.effects("regen").is_some());
    }
}
