//! Memory record types owned by the persona state.
//!
//! - [`Episode`] — what was said (append-only, capped at epoch compression)
//! - [`Thought`] — internal monologue from the ticker and dreams
//! - [`Artifact`] — milestones and epoch summaries
//! - [`Note`] — periodic reflections

pub mod artifact;
pub mod episodic;
pub mod thought;

pub use artifact::{Artifact, Note};
pub use episodic::Episode;
pub use thought::Thought;

/// Drop the oldest episodes so that at most `cap` remain.
///
/// Returns how many were dropped. Dropped episodes are not archived.
pub fn compress_episodes(episodes: &mut Vec<Episode>, cap: usize) -> usize {
    if episodes.len() <= cap {
        return 0;
    }
    let excess = episodes.len() - cap;
    episodes.drain(..excess);
    excess
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Actor;
    use chrono::Utc;

    #[test]
    fn compression_keeps_most_recent() {
        let now = Utc::now();
        let mut eps: Vec<Episode> = (0..25)
            .map(|i| Episode::new(Actor::User, format!("e {i}"), now))
            .collect();
        assert_eq!(compress_episodes(&mut eps, 10), 15);
        assert_eq!(eps.len(), 10);
        assert_eq!(eps[0].text, "e 15");
        assert_eq!(compress_episodes(&mut eps, 10), 0);
    }
}
