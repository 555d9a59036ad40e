// src/reconcile.rs
//
// Merges a fresh extraction into a stored calendar. Pure: time comes in
// as a parameter, nothing here touches the store.
//
// The source listing is authoritative for presence and order, so entries
// are replaced in full rather than unioned; entries the source removed
// disappear from the stored list too. Identity for "new" is url equality
// only. A changed title/date/author on a known url rides along with the
// replacement, it is not a new entry.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::Calendar;
use crate::scrape::Extraction;

/// Returns the updated calendar and how many extracted entries were not
/// previously known. `new_count` accumulates across refreshes until an
/// explicit acknowledge resets it.
pub fn reconcile(
    existing: &Calendar,
    extracted: &Extraction,
    now: DateTime<Utc>,
) -> (Calendar, usize) {
    let known: HashSet<&str> = existing.entries.iter().map(|e| e.url.as_str()).collect();
    let new_entry_count = extracted
        .entries
        .iter()
        .filter(|e| !known.contains(e.url.as_str()))
        .count();

    let mut updated = existing.clone();
    updated.title = extracted.title.clone();
    updated.entries = extracted.entries.clone();
    updated.last_updated = now;
    updated.new_count += new_entry_count as u32;

    (updated, new_entry_count)
}
