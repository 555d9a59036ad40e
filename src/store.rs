// src/store.rs
//
// JSON-file store for calendars, favorites and settings. One file per
// collection under the store directory, written atomically (temp file +
// rename) so a crashed write never leaves a half-serialized collection.
//
// Mutating operations serialize behind one mutex. commit_refresh re-reads
// the stored calendar under that lock before reconciling, so an
// overlapping manual refresh can never overwrite with a result computed
// from a stale snapshot.

use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::model::{Calendar, Favorite, Settings};
use crate::reconcile::reconcile;
use crate::scrape::Extraction;

const CALENDARS_FILE: &str = "calendars.json";
const FAVORITES_FILE: &str = "favorites.json";
const SETTINGS_FILE: &str = "settings.json";

pub struct Store {
    root: PathBuf,
    lock: Mutex<()>,
}

impl Store {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Box<dyn Error>> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, lock: Mutex::new(()) })
    }

    /* ---------------- calendars ---------------- */

    /// All subscribed calendars, insertion order.
    pub fn list_calendars(&self) -> Result<Vec<Calendar>, Box<dyn Error>> {
        read_collection(&self.root.join(CALENDARS_FILE))
    }

    pub fn load_calendar(&self, id: Uuid) -> Result<Option<Calendar>, Box<dyn Error>> {
        Ok(self.list_calendars()?.into_iter().find(|c| c.id == id))
    }

    /// Look a calendar up by id string or by source URL. CLI convenience.
    pub fn resolve_calendar(&self, which: &str) -> Result<Option<Calendar>, Box<dyn Error>> {
        let by_id = Uuid::parse_str(which).ok();
        Ok(self
            .list_calendars()?
            .into_iter()
            .find(|c| Some(c.id) == by_id || c.url == which))
    }

    /// Append a new subscription. Returns false (and stores nothing) if a
    /// calendar with the same source URL already exists.
    pub fn add_calendar(&self, calendar: &Calendar) -> Result<bool, Box<dyn Error>> {
        let _guard = self.guard()?;
        let mut calendars = self.list_calendars()?;
        if calendars.iter().any(|c| c.url == calendar.url) {
            return Ok(false);
        }
        calendars.push(calendar.clone());
        self.write_calendars(&calendars)?;
        Ok(true)
    }

    /// Replace a stored calendar wholesale, matched by id.
    pub fn update_calendar(&self, updated: &Calendar) -> Result<bool, Box<dyn Error>> {
        let _guard = self.guard()?;
        let mut calendars = self.list_calendars()?;
        match calendars.iter_mut().find(|c| c.id == updated.id) {
            Some(slot) => *slot = updated.clone(),
            None => return Ok(false),
        }
        self.write_calendars(&calendars)?;
        Ok(true)
    }

    pub fn remove_calendar(&self, id: Uuid) -> Result<bool, Box<dyn Error>> {
        let _guard = self.guard()?;
        let mut calendars = self.list_calendars()?;
        let before = calendars.len();
        calendars.retain(|c| c.id != id);
        if calendars.len() == before {
            return Ok(false);
        }
        self.write_calendars(&calendars)?;
        Ok(true)
    }

    /// Reconcile-then-persist for one calendar, atomically with respect to
    /// concurrent refreshes: the stored snapshot is re-read under the lock
    /// and the reconciled result written before the lock drops.
    ///
    /// Returns the new-entry delta, or None if the calendar was
    /// unsubscribed between fetch and commit.
    pub fn commit_refresh(
        &self,
        id: Uuid,
        extracted: &Extraction,
        now: DateTime<Utc>,
    ) -> Result<Option<usize>, Box<dyn Error>> {
        let _guard = self.guard()?;
        let mut calendars = self.list_calendars()?;
        let Some(slot) = calendars.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        let (updated, delta) = reconcile(slot, extracted, now);
        debug!("commit {}: {} entries, {} new", updated.url, updated.entries.len(), delta);
        *slot = updated;
        self.write_calendars(&calendars)?;
        Ok(Some(delta))
    }

    /// Acknowledge: zero every calendar's unseen count.
    pub fn clear_new_counts(&self) -> Result<(), Box<dyn Error>> {
        let _guard = self.guard()?;
        let mut calendars = self.list_calendars()?;
        for c in &mut calendars {
            c.new_count = 0;
        }
        self.write_calendars(&calendars)
    }

    /* ---------------- favorites ---------------- */

    pub fn list_favorites(&self) -> Result<Vec<Favorite>, Box<dyn Error>> {
        read_collection(&self.root.join(FAVORITES_FILE))
    }

    /// Pin an entry. Returns false if that URL is already pinned.
    pub fn add_favorite(&self, favorite: &Favorite) -> Result<bool, Box<dyn Error>> {
        let _guard = self.guard()?;
        let mut favorites = self.list_favorites()?;
        if favorites.iter().any(|f| f.url == favorite.url) {
            return Ok(false);
        }
        favorites.push(favorite.clone());
        write_json(&self.root.join(FAVORITES_FILE), &favorites)?;
        Ok(true)
    }

    pub fn remove_favorite(&self, url: &str) -> Result<bool, Box<dyn Error>> {
        let _guard = self.guard()?;
        let mut favorites = self.list_favorites()?;
        let before = favorites.len();
        favorites.retain(|f| f.url != url);
        if favorites.len() == before {
            return Ok(false);
        }
        write_json(&self.root.join(FAVORITES_FILE), &favorites)?;
        Ok(true)
    }

    /* ---------------- settings ---------------- */

    pub fn settings(&self) -> Result<Settings, Box<dyn Error>> {
        let path = self.root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Settings::default());
        }
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), Box<dyn Error>> {
        let _guard = self.guard()?;
        write_json(&self.root.join(SETTINGS_FILE), settings)
    }

    /* ---------------- plumbing ---------------- */

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, Box<dyn Error>> {
        self.lock.lock().map_err(|_| s!("store lock poisoned").into())
    }

    fn write_calendars(&self, calendars: &[Calendar]) -> Result<(), Box<dyn Error>> {
        write_json(&self.root.join(CALENDARS_FILE), &calendars)
    }
}

/// Missing file reads as the empty collection.
fn read_collection<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, Box<dyn Error>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
