//! Most-recently-active selection
//!
//! Ties go to the earliest item in traversal order: the scan only replaces the
//! running maximum on a strictly greater timestamp.

use chrono::{DateTime, Utc};

/// Return the key of the item with the latest activity, first one on ties.
pub fn most_recent<K, I>(items: I) -> Option<K>
where
    I: IntoIterator<Item = (K, DateTime<Utc>)>,
{
    let mut best: Option<(K, DateTime<Utc>)> = None;

    for (key, activity) in items {
        let newer = best
            .as_ref()
            .map_or(true, |(_, latest)| activity > *latest);
        if newer {
            best = Some((key, activity));
        }
    }

    best.map(|(key, _)| key)
}
