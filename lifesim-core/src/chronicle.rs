//! Chronicle export — a read-only markdown projection of a persona.

use std::fmt::Write as _;

use crate::state::PersonaState;

/// Episodes included at the end of the chronicle.
pub const CHRONICLE_EPISODES: usize = 30;

/// Render `state` as markdown.
#[must_use]
pub fn render_chronicle(state: &PersonaState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_chronicle(&mut out, state);
    out
}

fn write_chronicle(out: &mut String, state: &PersonaState) -> std::fmt::Result {
    writeln!(out, "# Chronik von {}", state.profile.name)?;
    writeln!(out)?;
    writeln!(
        out,
        "Epoch {} · Tag {} · {} · {} · Phase {}",
        state.epoch, state.day, state.time_block, state.location, state.life_phase
    )?;
    writeln!(
        out,
        "XP {} · Disziplin {} · Einsicht {} · Resilienz {}",
        state.xp, state.stats.discipline, state.stats.insight, state.stats.resilience
    )?;
    writeln!(out)?;

    writeln!(out, "## Bedürfnisse")?;
    for (need, value) in state.needs.as_map() {
        writeln!(out, "- {need}: {value}")?;
    }
    writeln!(out)?;

    writeln!(out, "## Präferenzen")?;
    list(out, &state.top_preferences(5))?;
    writeln!(out, "## Gewohnheiten")?;
    list(out, &state.top_habits(5))?;

    writeln!(out, "## Artefakte")?;
    if state.artifacts.is_empty() {
        writeln!(out, "- (keine)")?;
    }
    for artifact in &state.artifacts {
        writeln!(out, "- [E{}] {} ({}): {}", artifact.epoch, artifact.title, artifact.effect, artifact.notes)?;
    }
    writeln!(out)?;

    writeln!(out, "## Themen")?;
    if state.topics.is_empty() {
        writeln!(out, "- (keine)")?;
    }
    for (topic, count) in &state.topics {
        writeln!(out, "- {topic}: {count}")?;
    }
    writeln!(out)?;

    writeln!(out, "## Tagesziele")?;
    if state.objectives.is_empty() {
        writeln!(out, "- (keine)")?;
    }
    for objective in &state.objectives {
        let mark = if objective.done { "x" } else { " " };
        writeln!(
            out,
            "- [{mark}] {} {} → {}",
            objective.need, objective.baseline, objective.target
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Letzte Episoden")?;
    let start = state.episodes.len().saturating_sub(CHRONICLE_EPISODES);
    for episode in &state.episodes[start..] {
        writeln!(
            out,
            "- {} **{}**: {}",
            episode.ts.format("%Y-%m-%d %H:%M"),
            episode.actor,
            episode.text
        )?;
    }
    Ok(())
}

fn list(out: &mut String, items: &[String]) -> std::fmt::Result {
    if items.is_empty() {
        writeln!(out, "- (keine)")?;
    }
    for item in items {
        writeln!(out, "- {item}")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Episode;
    use crate::types::Actor;
    use chrono::Utc;

    #[test]
    fn chronicle_lists_only_recent_episodes() {
        let mut state = PersonaState::default();
        let now = Utc::now();
        for i in 0..40 {
            state.add_episode(Episode::new(Actor::User, format!("eintrag-{i:02}"), now));
        }
        state.record_topic("schlaf");
        let text = render_chronicle(&state);
        assert!(text.starts_with("# Chronik von Ari"));
        assert!(text.contains("Phase phase_1"));
        assert!(text.contains("- schlaf: 1"));
        assert!(!text.contains("eintrag-09"));
        assert!(text.contains("eintrag-10"));
        assert!(text.contains("eintrag-39"));
    }

    #[test]
    fn rendering_does_not_mutate() {
        let state = PersonaState::default();
        let before = state.clone();
        let _ = render_chronicle(&state);
        assert_eq!(state, before);
    }
}
