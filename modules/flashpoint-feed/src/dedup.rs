use std::collections::HashSet;

use flashpoint_common::Event;

/// Prefix length of the normalized title used as the dedup fingerprint.
const KEY_LEN: usize = 50;

/// Derived fingerprint for collapsing duplicate stories: the first 50
/// characters of the lower-cased, whitespace-collapsed canonical
/// (untranslated) title.
pub fn dedup_key(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(KEY_LEN)
        .collect()
}

/// Collapse near-duplicate events, first-seen-wins. Input order is the
/// aggregator's source fetch order: the first adapter to produce a story
/// owns it, later duplicates are discarded entirely.
pub fn dedupe(events: Vec<Event>) -> Vec<Event> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|ev| seen.insert(dedup_key(&ev.title)))
        .collect()
}
