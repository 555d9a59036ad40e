// tests/refresh_e2e.rs
//
// Full pipeline against canned pages: subscribe → refresh → acknowledge,
// with the store on disk and fetch stubbed at the trait seam.

use std::collections::HashMap;
use std::error::Error;
use std::sync::Mutex;

use ac_track::core::net::Fetch;
use ac_track::model::Favorite;
use ac_track::runner::{refresh_all, subscribe};
use ac_track::store::Store;

/// Mutable canned-page server: tests swap page bodies between cycles.
struct FakeSite {
    pages: Mutex<HashMap<String, String>>,
}

impl FakeSite {
    fn new() -> Self {
        Self { pages: Mutex::new(HashMap::new()) }
    }

    fn publish(&self, url: &str, body: String) {
        self.pages.lock().unwrap().insert(url.to_string(), body);
    }

    fn take_down(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }
}

impl Fetch for FakeSite {
    fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
        match self.pages.lock().unwrap().get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(format!("connection refused: {url}").into()),
        }
    }
}

fn item(date: &str, url: &str, author: &str, title: &str) -> String {
    format!(
        concat!(
            r#"<li class="item"><div class="date">{}</div>"#,
            r#"<div class="user"><img src="icon.png"> <a href="/users/1">{}</a></div>"#,
            r#"<div class="left"> <div class="link"><a href="{}">{}</a></div> <div>{}</div> </div>"#,
            r#" <div class="image"><img src="big.png"></div></li>"#,
        ),
        date, author, url, url, title
    )
}

fn page(title: &str, items: &[String]) -> String {
    format!(
        concat!(
            "<!DOCTYPE html><html><head><title>{} - Adventar</title></head>",
            r#"<body><ul class="EntryList">{}</ul></body></html>"#,
        ),
        title,
        items.concat()
    )
}

#[test]
fn subscribe_refresh_acknowledge_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let site = FakeSite::new();

    let url = "https://adventar.org/calendars/11";
    site.publish(url, page("Winter Fest", &[
        item("12/01", "https://x/1", "Ann", "My Post"),
    ]));

    let cal = subscribe(&store, &site, url).unwrap();
    assert_eq!(cal.title, "Winter Fest");
    assert_eq!(cal.entries.len(), 1);
    assert_eq!(cal.entries[0].author, "Ann");
    assert_eq!(cal.new_count, 0);

    // Two more entries appear on the page.
    site.publish(url, page("Winter Fest", &[
        item("12/01", "https://x/1", "Ann", "My Post"),
        item("12/02", "https://x/2", "Bob", "Second"),
        item("12/03", "https://x/3", "Cat", "Third"),
    ]));
    let summary = refresh_all(&store, &site, None).unwrap();
    assert_eq!(summary.new_entries, 2);

    let stored = store.load_calendar(cal.id).unwrap().unwrap();
    assert_eq!(stored.entries.len(), 3);
    assert_eq!(stored.new_count, 2);

    // Acknowledge clears the unseen count but keeps the entries.
    store.clear_new_counts().unwrap();
    let stored = store.load_calendar(cal.id).unwrap().unwrap();
    assert_eq!(stored.new_count, 0);
    assert_eq!(stored.entries.len(), 3);
}

#[test]
fn outage_leaves_state_untouched_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let site = FakeSite::new();

    let url = "https://adventar.org/calendars/3";
    site.publish(url, page("Flaky", &[item("12/01", "https://x/1", "Ann", "One")]));
    let cal = subscribe(&store, &site, url).unwrap();

    // Outage: fetch fails, reconcile must not run, entries survive.
    site.take_down(url);
    let summary = refresh_all(&store, &site, None).unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.new_entries, 0);
    let stored = store.load_calendar(cal.id).unwrap().unwrap();
    assert_eq!(stored.entries.len(), 1);

    // Back up with one more entry.
    site.publish(url, page("Flaky", &[
        item("12/01", "https://x/1", "Ann", "One"),
        item("12/02", "https://x/2", "Ann", "Two"),
    ]));
    let summary = refresh_all(&store, &site, None).unwrap();
    assert_eq!(summary.refreshed, 1);
    assert_eq!(summary.new_entries, 1);
}

#[test]
fn source_shrinking_drops_entries_without_counting_new() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let site = FakeSite::new();

    let url = "https://adventar.org/calendars/5";
    site.publish(url, page("Shrink", &[
        item("12/01", "https://x/1", "Ann", "One"),
        item("12/02", "https://x/2", "Bob", "Two"),
    ]));
    let cal = subscribe(&store, &site, url).unwrap();

    site.publish(url, page("Shrink", &[item("12/01", "https://x/1", "Ann", "One")]));
    let summary = refresh_all(&store, &site, None).unwrap();
    assert_eq!(summary.new_entries, 0);

    let stored = store.load_calendar(cal.id).unwrap().unwrap();
    assert_eq!(stored.entries.len(), 1);
    assert_eq!(stored.entries[0].url, "https://x/1");
}

#[test]
fn favorites_survive_refresh_even_when_source_drops_the_entry() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let site = FakeSite::new();

    let url = "https://adventar.org/calendars/8";
    site.publish(url, page("Pins", &[item("12/01", "https://x/1", "Ann", "Keep Me")]));
    let cal = subscribe(&store, &site, url).unwrap();

    let fav = Favorite::pin(&cal.entries[0], &cal.title);
    assert!(store.add_favorite(&fav).unwrap());

    // Source drops the entry; the pin is denormalized and keeps its copy.
    site.publish(url, page("Pins", &[]));
    refresh_all(&store, &site, None).unwrap();

    assert!(store.load_calendar(cal.id).unwrap().unwrap().entries.is_empty());
    let favs = store.list_favorites().unwrap();
    assert_eq!(favs.len(), 1);
    assert_eq!(favs[0].title, "Keep Me");
    assert_eq!(favs[0].calendar_title, "Pins");
}
