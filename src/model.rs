// src/model.rs
//
// Record shapes for the tracker. These are the persisted JSON shapes too,
// so field renames are wire-format changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::params::UNKNOWN_AUTHOR;

/// One dated, linked item within a calendar's published list.
///
/// `url` is the identity key within a calendar. `date` is opaque display
/// text (locale-specific day/month notation on the site), never parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub date: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub icon: Option<String>,
}

/// Extraction grammar tag. One value today; the store carries it so other
/// calendar sites can be added without migrating persisted data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Adventar,
}

/// A subscribed calendar source.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub platform: Platform,
    /// Source order, top of page first. Significant for display only.
    pub entries: Vec<Entry>,
    pub last_updated: DateTime<Utc>,
    /// Accumulated unseen-entry count; reset only by acknowledge.
    pub new_count: u32,
}

impl Calendar {
    /// Fresh subscription: entries as first extracted, nothing unseen yet.
    pub fn subscribe(
        url: &str,
        title: String,
        entries: Vec<Entry>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: s!(url),
            title,
            platform: Platform::Adventar,
            entries,
            last_updated: now,
            new_count: 0,
        }
    }
}

/// A user-pinned entry, denormalized so it survives the source dropping
/// the entry. Keyed by `url`, unique across favorites.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub url: String,
    pub title: String,
    pub date: String,
    pub author: String,
    pub icon: Option<String>,
    /// Owning calendar's title at pin time.
    pub calendar_title: String,
}

impl Favorite {
    pub fn pin(entry: &Entry, calendar_title: &str) -> Self {
        Self {
            url: entry.url.clone(),
            title: entry.title.clone(),
            date: entry.date.clone(),
            author: if entry.author.is_empty() {
                s!(UNKNOWN_AUTHOR)
            } else {
                entry.author.clone()
            },
            icon: entry.icon.clone(),
            calendar_title: s!(calendar_title),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub refresh_interval_mins: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_mins: crate::params::DEFAULT_REFRESH_INTERVAL_MINS,
        }
    }
}
