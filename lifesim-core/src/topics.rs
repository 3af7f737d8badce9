//! Keyword topic detection for user turns.

/// Topic id → keywords. First matching topic wins.
pub const TOPIC_KEYWORDS: [(&str, &[&str]); 5] = [
    ("arbeit", &["arbeit", "job", "projekt", "meeting", "chef"]),
    ("schlaf", &["schlaf", "müde", "nacht", "aufwachen"]),
    ("beziehung", &["freund", "familie", "partner", "einsam"]),
    ("gesundheit", &["sport", "laufen", "essen", "krank", "stretch"]),
    ("lernen", &["lernen", "buch", "kurs", "idee", "fokus"]),
];

/// Topic of `text`, if any keyword occurs in it (case-insensitive).
#[must_use]
pub fn detect_topic(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(topic, _)| *topic)
}
