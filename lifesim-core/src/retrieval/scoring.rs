//! Per-factor scoring functions for lexical episode retrieval.
//!
//! Score = w₁·Lexical(e) + w₂·Importance(e) + w₃·Recency(e)
//!
//! Where:
//!   Lexical(e)    = |{t ∈ query : t ⊂ text(e)}| / |query|
//!   Importance(e) = stored importance (0–1)
//!   Recency(e)    = 1 / (1 + Δhours), "now" being the newest episode

use chrono::{DateTime, Utc};

use crate::config::RetrievalWeights;
use crate::memory::Episode;
use crate::retrieval::ScoreBreakdown;

/// Lower-case whitespace tokens with at least `min_len` characters.
#[must_use]
pub fn tokenize(query: &str, min_len: usize) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

/// Compute the weighted breakdown for one episode.
#[must_use]
pub fn compute_breakdown(
    episode: &Episode,
    tokens: &[String],
    now: DateTime<Utc>,
    weights: &RetrievalWeights,
) -> ScoreBreakdown {
    ScoreBreakdown {
        lexical: weights.lexical * lexical_overlap(episode, tokens),
        importance: weights.importance * f64::from(episode.importance.clamp(0.0, 1.0)),
        recency: weights.recency * recency_score(episode, now),
    }
}

/// Fraction of query tokens found as substrings of the episode text.
fn lexical_overlap(episode: &Episode, tokens: &[String]) -> f64 {
    let text = episode.text.to_lowercase();
    let hits = tokens.iter().filter(|t| text.contains(t.as_str())).count();
    hits as f64 / tokens.len().max(1) as f64
}

/// Hyperbolic recency: 1.0 for the newest episode, 0.5 one hour earlier.
fn recency_score(episode: &Episode, now: DateTime<Utc>) -> f64 {
    let delta_secs = (now - episode.ts).num_milliseconds().max(0) as f64 / 1000.0;
    1.0 / (1.0 + delta_secs / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Actor;
    use chrono::Duration;

    #[test]
    fn short_tokens_are_dropped() {
        assert_eq!(tokenize("Ich bin so müde", 3), vec!["ich", "bin", "müde"]);
        assert!(tokenize("ab c", 3).is_empty());
    }

    #[test]
    fn recency_halves_after_one_hour() {
        let now = Utc::now();
        let ep = Episode::new(Actor::User, "x", now - Duration::hours(1));
        assert!((recency_score(&ep, now) - 0.5).abs() < 1e-9);
        let fresh = Episode::new(Actor::User, "x", now);
        assert!((recency_score(&fresh, now) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn overlap_is_substring_based() {
        let ep = Episode::new(Actor::User, "Ich war heute müde und unruhig", Utc::now());
        let tokens = tokenize("müde unruhig traurig", 3);
        assert!((lexical_overlap(&ep, &tokens) - 2.0 / 3.0).abs() < 1e-9);
        assert!(lexical_overlap(&ep, &[]).abs() < 1e-9);
    }
}
