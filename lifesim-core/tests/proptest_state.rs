//! Property-based tests for the persona state invariants.
//!
//! Uses `proptest` to check the need model, retrieval bounds, epoch
//! advancement and snapshot round trips under random inputs.

use proptest::prelude::*;

use chrono::{Duration, TimeZone, Utc};
use lifesim_core::epoch::advance_epoch;
use lifesim_core::memory::Episode;
use lifesim_core::needs::{NEED_MAX, NEED_MID, NEED_MIN, Need, NeedDeltas, NeedState};
use lifesim_core::persistence::{from_snapshot, to_snapshot};
use lifesim_core::retrieval::MemoryIndex;
use lifesim_core::{Actor, PersonaState};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_needs() -> impl Strategy<Value = NeedState> {
    prop::array::uniform6(NEED_MIN..=NEED_MAX).prop_map(|v| {
        let mut needs = NeedState::default();
        for (need, value) in Need::ALL.into_iter().zip(v) {
            needs.set(need, value);
        }
        needs
    })
}

fn arb_deltas() -> impl Strategy<Value = NeedDeltas> {
    let key = prop::sample::select(vec![
        "energy", "clarity", "connection", "order", "creativity", "calm", "hunger",
    ]);
    prop::collection::btree_map(key.prop_map(|s| s.to_string()), -500..500i32, 0..8)
}

fn in_range(needs: &NeedState) -> bool {
    Need::ALL
        .into_iter()
        .all(|n| (NEED_MIN..=NEED_MAX).contains(&needs.get(n)))
}

// ---------------------------------------------------------------------------
// Property: every need stays in [0, 100] after apply_delta
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn apply_delta_stays_in_range(needs in arb_needs(), deltas in arb_deltas()) {
        let mut needs = needs;
        needs.apply_delta(&deltas);
        prop_assert!(in_range(&needs));
    }
}

// ---------------------------------------------------------------------------
// Property: decay moves toward the mid-point and never past it
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decay_is_monotone_towards_mid(needs in arb_needs(), amount in 0..=i32::MAX) {
        let mut decayed = needs;
        decayed.decay_towards_mid(amount);
        for need in Need::ALL {
            let before = needs.get(need);
            let after = decayed.get(need);
            if before > NEED_MID {
                prop_assert!(after <= before && after >= NEED_MID);
            } else if before < NEED_MID {
                prop_assert!(after >= before && after <= NEED_MID);
            } else {
                prop_assert_eq!(after, NEED_MID);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: repeated decay converges to exactly 50
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decay_converges(deltas in arb_deltas(), amount in 1..10i32) {
        let mut needs = NeedState::default();
        needs.apply_delta(&deltas);
        for _ in 0..(50 / amount + 1) {
            needs.decay_towards_mid(amount);
        }
        prop_assert_eq!(needs, NeedState::default());
    }
}

// ---------------------------------------------------------------------------
// Property: retrieval returns at most k results, all from the window
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn retrieval_bounded(count in 0..250usize, k in 0..20usize, query in "[a-z ]{0,30}") {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid ts");
        let episodes: Vec<Episode> = (0..count)
            .map(|i| Episode::new(Actor::User, format!("eintrag {i} regen"), t0 + Duration::minutes(i as i64)))
            .collect();
        let hits = MemoryIndex::default().retrieve(&episodes, &query, k);
        prop_assert!(hits.len() <= k.min(count).min(100));
        let window_start = count.saturating_sub(100);
        for hit in &hits {
            let pos = episodes.iter().position(|e| e.id == hit.episode.id).expect("from log");
            prop_assert!(pos >= window_start);
        }
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: advance_epoch increments, mints one artifact, respects the cap
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn epoch_advance_invariants(count in 0..300usize, cap in 1..120usize, xp in 0..400u32, epochs in 1..8usize) {
        let mut state = PersonaState::default();
        state.max_episode_history = cap;
        state.xp = xp;
        let now = Utc::now();
        for i in 0..count {
            state.add_episode(Episode::new(Actor::User, format!("e{i}"), now));
        }
        for _ in 0..epochs {
            let epoch_before = state.epoch;
            let artifacts_before = state.artifacts.len();
            let phase_before = state.life_phase;
            let report = advance_epoch(&mut state, now);
            prop_assert_eq!(state.epoch, epoch_before + 1);
            prop_assert_eq!(state.artifacts.len(), artifacts_before + 1);
            let title = &state.artifacts[artifacts_before].title;
            prop_assert!(title.contains(&state.epoch.to_string()));
            prop_assert_eq!(report.epoch, state.epoch);
            prop_assert!(state.episodes.len() <= cap);
            prop_assert!(state.life_phase >= phase_before);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: snapshots round-trip
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn snapshot_round_trip(
        needs in arb_needs(),
        texts in prop::collection::vec("[a-zA-Zäöü ]{1,40}", 0..20),
        habits in prop::collection::vec("[a-z ]{1,20}", 0..10),
        epoch in 0..50u32,
    ) {
        let mut state = PersonaState::default();
        state.needs = needs;
        state.epoch = epoch;
        let now = Utc::now();
        for text in &texts {
            state.add_episode(Episode::new(Actor::User, text.clone(), now));
        }
        for habit in &habits {
            state.record_habit(habit);
        }
        let bytes = to_snapshot(&state).expect("encode");
        let restored = from_snapshot(&bytes).expect("decode");
        prop_assert_eq!(&restored.needs, &state.needs);
        prop_assert_eq!(&restored.episodes, &state.episodes);
        prop_assert_eq!(&restored.habit_counts, &state.habit_counts);
        prop_assert_eq!(restored.epoch, state.epoch);
        prop_assert_eq!(restored, state);
    }
}
