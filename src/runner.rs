// src/runner.rs
//
// Batch refresh orchestration. All I/O (fetch, persistence) happens here;
// extraction and reconciliation stay pure. One calendar failing never
// aborts the rest of the cycle: its stored state is left untouched and it
// contributes zero to the cycle's aggregate.

use std::error::Error;

use chrono::Utc;
use log::{info, warn};

use crate::core::net::Fetch;
use crate::model::Calendar;
use crate::scrape::{self, Extraction};
use crate::store::Store;

/// Optional progress sink for frontends.
/// CLI: print lines; a GUI would update labels instead.
pub trait Progress {
    fn begin(&mut self, _total: usize) {}
    fn log(&mut self, _msg: &str) {}
    fn item_done(&mut self, _url: &str, _new_entries: usize) {}
    fn finish(&mut self) {}
}

/// A no-op progress sink you can pass when you don't care.
pub struct NullProgress;
impl Progress for NullProgress {}

/// What one refresh cycle produced. `new_entries` is this cycle's sum
/// only (drives the badge/notification signal); per-calendar accumulated
/// counts live on the calendars themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub new_entries: usize,
}

/// Refresh every subscribed calendar, isolating failures per calendar.
pub fn refresh_all(
    store: &Store,
    fetch: &dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<CycleSummary, Box<dyn Error>> {
    let calendars = store.list_calendars()?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(calendars.len());
    }

    let mut summary = CycleSummary::default();
    for calendar in &calendars {
        match refresh_one(store, fetch, calendar) {
            Ok(delta) => {
                summary.refreshed += 1;
                summary.new_entries += delta;
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&calendar.url, delta);
                }
            }
            Err(e) => {
                summary.failed += 1;
                warn!("refresh failed for {}: {e}", calendar.url);
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("{}: {e}", calendar.url));
                }
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    info!(
        "cycle done: {} refreshed, {} failed, {} new entries",
        summary.refreshed, summary.failed, summary.new_entries
    );
    Ok(summary)
}

/// Fetch, extract and commit one calendar. A fetch error propagates
/// without touching stored state; extraction itself never fails.
/// Returns the new-entry delta (0 if the calendar vanished mid-cycle).
pub fn refresh_one(
    store: &Store,
    fetch: &dyn Fetch,
    calendar: &Calendar,
) -> Result<usize, Box<dyn Error>> {
    let raw = fetch.get(&calendar.url)?;
    let extracted = scrape::parse_document(&raw);
    note_degradation(&calendar.url, calendar.entries.len(), &extracted);

    let delta = store.commit_refresh(calendar.id, &extracted, Utc::now())?;
    Ok(delta.unwrap_or(0))
}

/// Subscribe to a calendar page: initial fetch + extract, unseen count 0.
pub fn subscribe(
    store: &Store,
    fetch: &dyn Fetch,
    url: &str,
) -> Result<Calendar, Box<dyn Error>> {
    let raw = fetch.get(url)?;
    let extracted = scrape::parse_document(&raw);
    note_degradation(url, 0, &extracted);

    let calendar = Calendar::subscribe(url, extracted.title, extracted.entries, Utc::now());
    if !store.add_calendar(&calendar)? {
        return Err(format!("already subscribed: {url}").into());
    }
    info!("subscribed {} ({} entries)", url, calendar.entries.len());
    Ok(calendar)
}

/// Extraction can't fail, but it can quietly come back with nothing.
/// Surface the cases an operator would want to know about.
fn note_degradation(url: &str, had_entries: usize, extracted: &Extraction) {
    if extracted.looks_drifted() {
        warn!(
            "{url}: entry list found but all {} items were skipped; markup may have drifted",
            extracted.skipped_items
        );
    } else if extracted.skipped_items > 0 {
        warn!("{url}: skipped {} malformed items", extracted.skipped_items);
    }
    if had_entries > 0 && extracted.entries.is_empty() {
        warn!("{url}: extraction found no entries (had {had_entries}); stored list will empty");
    }
}
