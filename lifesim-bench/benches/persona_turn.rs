//! LifeSim Benchmark Suite
//!
//! Targets on a laptop-class CPU:
//!   retrieval_top3_window100 ......... < 100μs
//!   rank_builtin_catalog ............. < 20μs
//!   persona_reply_200_episodes ....... < 500μs

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use lifesim_bench::{epoch_start, synthetic_log};
use lifesim_core::actions::{ActionCatalog, rank};
use lifesim_core::config::RetrievalConfig;
use lifesim_core::needs::{Need, NeedState};
use lifesim_core::retrieval::MemoryIndex;
use lifesim_core::{LifeSimEngine, LifesimConfig, ManualClock, PersonaState};

/// Retrieval over growing logs; the window caps the work at 100 episodes.
fn bench_retrieval(c: &mut Criterion) {
    let index = MemoryIndex::new(RetrievalConfig::default());
    let mut group = c.benchmark_group("retrieval_top3");
    for size in [50usize, 200, 1000] {
        let log = synthetic_log(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &log, |b, log| {
            b.iter(|| black_box(index.retrieve(black_box(log), "müde nach der Arbeit am Projekt", 3).len()));
        });
    }
    group.finish();
}

/// Ranking the built-in catalog against a deficient need state.
fn bench_rank(c: &mut Criterion) {
    let catalog = ActionCatalog::builtin();
    let mut needs = NeedState::default();
    needs.set(Need::Energy, 30);
    needs.set(Need::Clarity, 35);
    needs.set(Need::Connection, 40);
    let knobs = PersonaState::default().overmind.ranking_knobs();
    let habits = vec!["2-min atemfokus".to_string()];
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("rank_builtin_catalog", |b| {
        b.iter(|| black_box(rank(&catalog, black_box(&needs), knobs, &habits, false, &mut rng)));
    });
}

/// A full turn on a persona with a long history.
fn bench_persona_reply(c: &mut Criterion) {
    let clock = ManualClock::new(epoch_start());
    let mut state = PersonaState::default();
    for episode in synthetic_log(200) {
        state.add_episode(episode);
    }
    let mut engine = LifeSimEngine::new(state, LifesimConfig::default())
        .with_clock(Arc::new(clock))
        .with_seed(11);

    c.bench_function("persona_reply_200_episodes", |b| {
        b.iter(|| black_box(engine.persona_reply(black_box("Ich bin müde und unruhig"), None).actions.len()));
    });
}

criterion_group!(benches, bench_retrieval, bench_rank, bench_persona_reply);
criterion_main!(benches);
