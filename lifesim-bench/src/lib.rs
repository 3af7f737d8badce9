//! Fixtures shared by the LifeSim benchmarks.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lifesim_core::memory::Episode;
use lifesim_core::types::Actor;

const PHRASES: [&str; 6] = [
    "Heute war die Arbeit im Projekt anstrengend",
    "Ich habe schlecht geschlafen und bin müde",
    "Mit einem Freund telefoniert, tat gut",
    "Kurz laufen gewesen, Kopf frei",
    "Ein neues Buch über Fokus angefangen",
    "Der Schreibtisch ist wieder voller Zettel",
];

/// Fixed start of every synthetic log.
#[must_use]
pub fn epoch_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).single().unwrap_or_default()
}

/// `n` alternating user and persona episodes, one minute apart.
#[must_use]
pub fn synthetic_log(n: usize) -> Vec<Episode> {
    let start = epoch_start();
    (0..n)
        .map(|i| {
            let actor = if i % 2 == 0 { Actor::User } else { Actor::Persona };
            let minutes = i64::try_from(i).unwrap_or(i64::MAX);
            Episode::new(actor, format!("{} ({i})", PHRASES[i % PHRASES.len()]), start + Duration::minutes(minutes))
        })
        .collect()
}
