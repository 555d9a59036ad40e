// src/params.rs
use std::path::PathBuf;

// Site
pub const TITLE_SUFFIX: &str = " - Adventar";

// Markup markers the extractor keys on.
// Assumptions (by design):
// - calendar title lives in <title>NAME - Adventar</title>
// - the entry list is <ul class="EntryList">
// - each entry is a <li class="item"> with date/user/link/left/image divs
pub const LIST_CLASS: &str = "EntryList";
pub const ITEM_CLASS: &str = "item";
pub const DATE_CLASS: &str = "date";
pub const USER_CLASS: &str = "user";
pub const LINK_CLASS: &str = "link";
pub const LEFT_CLASS: &str = "left";
pub const IMAGE_CLASS: &str = "image";

// Fallback display values
pub const UNKNOWN_CALENDAR: &str = "Unknown Calendar";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

// Local store
pub const DEFAULT_STORE_DIR: &str = ".store";

// Settings
pub const DEFAULT_REFRESH_INTERVAL_MINS: u64 = 60;

// Net
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Subscribe to a calendar by page URL
    Add { url: String },
    /// Refresh all subscribed calendars
    Update,
    /// List subscribed calendars with unseen counts
    List,
    /// Show one calendar's entries (by id or source URL)
    Show { which: String },
    /// Unsubscribe (by id or source URL)
    Remove { which: String },
    /// Pin an entry: calendar + entry URL
    FavAdd { which: String, entry_url: String },
    FavList,
    FavRemove { entry_url: String },
    /// Reset all unseen counts
    Ack,
    /// Set the stored refresh interval (minutes)
    Interval { mins: u64 },
}

#[derive(Clone, Debug)]
pub struct Params {
    pub command: Command,
    pub store_dir: PathBuf,   // where calendars/favorites/settings live
    pub verbose: bool,        // debug-level logging
}

impl Params {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            verbose: false,
        }
    }
}
