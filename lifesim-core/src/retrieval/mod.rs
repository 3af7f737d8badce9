//! Memory Retrieval — lexical + importance + recency scoring.
//!
//! Deliberately not a vector search: the score is cheap to compute and easy to
//! explain in a reply. Only the most recent `window` episodes are scored.

pub mod scoring;

use crate::config::RetrievalConfig;
use crate::memory::Episode;

/// A scored retrieval result.
#[derive(Debug, Clone)]
pub struct RetrievalResult<'a> {
    /// The retrieved episode.
    pub episode: &'a Episode,
    /// Combined score.
    pub score: f64,
    /// Per-factor breakdown.
    pub breakdown: ScoreBreakdown,
}

/// Breakdown of a retrieval score into its weighted factors.
#[derive(Debug, Clone, Default)]
pub struct ScoreBreakdown {
    /// Lexical overlap contribution.
    pub lexical: f64,
    /// Importance contribution.
    pub importance: f64,
    /// Recency contribution.
    pub recency: f64,
}

impl ScoreBreakdown {
    /// Sum of all factors.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lexical + self.importance + self.recency
    }
}

/// Scores an episode log against a free-text query.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    config: RetrievalConfig,
}

impl MemoryIndex {
    /// Create an index with the given configuration.
    #[must_use]
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    /// Top-`k` episodes for `query`, best first; ties keep log order.
    #[must_use]
    pub fn retrieve<'a>(&self, episodes: &'a [Episode], query: &str, k: usize) -> Vec<RetrievalResult<'a>> {
        let Some(newest) = episodes.last() else {
            return Vec::new();
        };
        let now = newest.ts;
        let tokens = scoring::tokenize(query, self.config.min_token_len);
        let start = episodes.len().saturating_sub(self.config.window);

        let mut results: Vec<RetrievalResult<'a>> = episodes[start..]
            .iter()
            .map(|episode| {
                let breakdown = scoring::compute_breakdown(episode, &tokens, now, &self.config.weights);
                RetrievalResult {
                    episode,
                    score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        // Stable: equal scores stay in chronological order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(k);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Actor;
    use chrono::{Duration, Utc};

    fn log(texts: &[&str]) -> Vec<Episode> {
        let t0 = Utc::now();
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Episode::new(Actor::User, *t, t0 + Duration::minutes(i as i64)))
            .collect()
    }

    #[test]
    fn lexical_match_wins() {
        let eps = log(&["Regen am Morgen", "Sport im Park", "Noch mehr Regen heute", "Kaffee"]);
        let index = MemoryIndex::default();
        let hits = index.retrieve(&eps, "regen", 2);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.episode.text.to_lowercase().contains("regen")));
        // Newer match ranks first.
        assert_eq!(hits[0].episode.text, "Noch mehr Regen heute");
    }

    #[test]
    fn empty_log_returns_nothing() {
        let index = MemoryIndex::default();
        assert!(index.retrieve(&[], "egal", 3).is_empty());
    }

    #[test]
    fn only_window_is_scored() {
        let mut eps = log(&["alpha treffer"]);
        eps.extend(log(&["filler"; 150]));
        let index = MemoryIndex::default();
        let hits = index.retrieve(&eps, "alpha", 200);
        assert_eq!(hits.len(), 100);
        assert!(hits.iter().all(|h| h.episode.text == "filler"));
    }

    #[test]
    fn identical_scores_keep_log_order() {
        let t0 = Utc::now();
        let eps: Vec<Episode> = ["eins", "zwei", "drei"]
            .iter()
            .map(|t| Episode::new(Actor::User, *t, t0))
            .collect();
        let index = MemoryIndex::default();
        let hits = index.retrieve(&eps, "nichts", 3);
        let order: Vec<&str> = hits.iter().map(|h| h.episode.text.as_str()).collect();
        assert_eq!(order, vec!["eins", "zwei", "drei"]);
    }
}
