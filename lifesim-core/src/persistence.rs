//! Persona persistence: JSON snapshot files.
//!
//! A snapshot is written to a sibling temp file and renamed over the target,
//! so a crash never leaves half a state.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::error::{LifesimError, Result};
use crate::state::PersonaState;

// ---------------------------------------------------------------------------
// Snapshot files
// ---------------------------------------------------------------------------

/// Encode a state as pretty JSON.
///
/// # Errors
///
/// Returns [`LifesimError::Serialization`] if encoding fails.
pub fn to_snapshot(state: &PersonaState) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(state).map_err(|e| LifesimError::Serialization(e.to_string()))
}

/// Decode a state from JSON.
///
/// # Errors
///
/// Returns [`LifesimError::Snapshot`] if the bytes are not a valid state.
pub fn from_snapshot(bytes: &[u8]) -> Result<PersonaState> {
    serde_json::from_slice(bytes).map_err(|e| LifesimError::Snapshot(e.to_string()))
}

/// Atomically replace `path` with a snapshot of `state`.
///
/// # Errors
///
/// Returns [`LifesimError::Serialization`] or [`LifesimError::Io`].
pub fn save_state(state: &PersonaState, path: &Path) -> Result<()> {
    let start = Instant::now();
    let bytes = to_snapshot(state)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, path)?;

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        episodes = state.episodes.len(),
        elapsed_us = start.elapsed().as_micros(),
        "Saved state snapshot"
    );
    Ok(())
}

/// Load the snapshot at `path`; `Ok(None)` when there is no file.
///
/// A file that exists but does not decode is a hard error: silently starting
/// fresh would lose the persona's history.
///
/// # Errors
///
/// Returns [`LifesimError::Io`] or [`LifesimError::Snapshot`].
pub fn load_state(path: &Path) -> Result<Option<PersonaState>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    let state = from_snapshot(&bytes)?;
    debug!(path = %path.display(), turn = state.turn, episodes = state.episodes.len(), "Loaded state snapshot");
    Ok(Some(state))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::memory::Episode;
    use crate::needs::Need;
    use crate::types::Actor;

    fn sample_state() -> PersonaState {
        let mut state = PersonaState::default();
        state.needs.set(Need::Clarity, 33);
        state.add_episode(Episode::new(Actor::User, "Ich bin müde", Utc::now()));
        state.record_habit("kurzer stretch");
        state.epoch = 2;
        state
    }

    #[test]
    fn snapshot_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("state.json");
        let state = sample_state();
        save_state(&state, &path).expect("save");
        assert!(!tmp_path(&path).exists());
        let loaded = load_state(&path).expect("load").expect("present");
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_snapshot_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_state(&dir.path().join("state.json")).expect("load").is_none());
    }

    #[test]
    fn malformed_snapshot_is_a_hard_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{\"needs\": 12").expect("write");
        let err = load_state(&path).expect_err("must fail");
        assert!(matches!(err, LifesimError::Snapshot(_)));
    }
}
