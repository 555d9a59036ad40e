// src/scrape/adventar.rs
//
// Extraction engine for Adventar calendar pages.
//
// Total over all inputs: any string in, a (possibly empty) Extraction out.
// Source markup is externally controlled and drifts; a malformed page must
// degrade to defaults rather than abort a batch refresh. Two fields are
// required per item (date + link) because an entry without them has no
// identity or display value; everything else falls back.

use crate::core::html;
use crate::model::Entry;
use crate::params::{
    DATE_CLASS, IMAGE_CLASS, ITEM_CLASS, LEFT_CLASS, LINK_CLASS, LIST_CLASS,
    TITLE_SUFFIX, UNKNOWN_AUTHOR, UNKNOWN_CALENDAR, USER_CLASS,
};

/// Result of one document pass, plus enough diagnostics to tell
/// "nothing published" apart from "markup drifted under us".
#[derive(Clone, Debug)]
pub struct Extraction {
    pub title: String,
    pub entries: Vec<Entry>,
    /// Whether the entry-list container marker was present at all.
    pub list_found: bool,
    /// Non-whitespace item segments that produced no entry.
    pub skipped_items: usize,
}

impl Extraction {
    /// A container was there with real content but nothing came out.
    /// Strong hint the site's markup changed shape.
    pub fn looks_drifted(&self) -> bool {
        self.list_found && self.entries.is_empty() && self.skipped_items > 0
    }
}

/// Parse a raw Adventar page. Never fails; unrelated or empty input yields
/// the unknown-title/empty-list extraction.
pub fn parse_document(doc: &str) -> Extraction {
    let title = extract_title(doc).unwrap_or_else(|| s!(UNKNOWN_CALENDAR));

    let Some(list) = html::class_block(doc, "ul", LIST_CLASS) else {
        // No list container: nothing published yet. A valid state.
        return Extraction { title, entries: Vec::new(), list_found: false, skipped_items: 0 };
    };

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for item in html::split_items(list, "li", ITEM_CLASS) {
        if item.trim().is_empty() {
            continue;
        }
        match parse_item(item) {
            Some(e) => entries.push(e),
            None => skipped += 1,
        }
    }

    Extraction { title, entries, list_found: true, skipped_items: skipped }
}

/// First `<title>NAME - Adventar</title>`, NAME verbatim.
fn extract_title(doc: &str) -> Option<String> {
    let mut pos = 0usize;
    while let Some(rel) = doc[pos..].find("<title") {
        let start = pos + rel;
        let gt = doc[start..].find('>')? + start;
        let end = doc[gt + 1..].find("</title>")? + gt + 1;
        if let Some(content) = doc[gt + 1..end].strip_suffix(TITLE_SUFFIX) {
            return Some(s!(content));
        }
        pos = end + "</title>".len();
    }
    None
}

/* ---------------- per-item extractors ---------------- */

// Each sub-extractor is independent and returns Option; parse_item wires
// up the required/optional split and the title fallback chain.

fn parse_item(item: &str) -> Option<Entry> {
    let date = item_date(item)?;
    let url = item_link(item)?;
    let icon = item_icon(item);
    let author = item_author(item).unwrap_or_else(|| s!(UNKNOWN_AUTHOR));
    let title = item_title_left(item)
        .or_else(|| item_title_after_link(item))
        .unwrap_or_else(|| url.clone());
    Some(Entry { date, title, url, author, icon })
}

/// Immediate text of the first date-classed element. Required.
fn item_date(item: &str) -> Option<String> {
    let at = html::after_class_marker(item, DATE_CLASS, 0)?;
    let text = html::text_run(item, at).trim();
    if text.is_empty() { None } else { Some(s!(text)) }
}

/// `href` of the anchor sitting immediately inside the link div. Required.
fn item_link(item: &str) -> Option<String> {
    let at = html::after_class_marker(item, LINK_CLASS, 0)?;
    if !item[at..].starts_with("<a") {
        return None;
    }
    html::tag_attr(item, at, "href").map(|v| s!(v))
}

/// Inner span of the user-classed element: from past its open tag to its
/// first `</div>` (or segment end when the close never shows up).
fn user_span(item: &str) -> Option<&str> {
    let at = html::after_class_marker(item, USER_CLASS, 0)?;
    match item[at..].find("</div>") {
        Some(rel) => Some(&item[at..at + rel]),
        None => Some(&item[at..]),
    }
}

/// First image address inside the user element.
fn item_icon(item: &str) -> Option<String> {
    let user = user_span(item)?;
    let mut pos = 0usize;
    while let Some(rel) = user[pos..].find("<img") {
        let img = pos + rel;
        if let Some(src) = html::tag_attr(user, img, "src") {
            return Some(s!(src));
        }
        pos = img + "<img".len();
    }
    None
}

/// First non-empty anchor text inside the user element.
fn item_author(item: &str) -> Option<String> {
    let user = user_span(item)?;
    let mut pos = 0usize;
    while let Some(rel) = user[pos..].find("<a") {
        let a = pos + rel;
        let gt = user[a..].find('>')? + a;
        let text = html::text_run(user, gt + 1).trim();
        if !text.is_empty() {
            return Some(s!(text));
        }
        pos = gt + 1;
    }
    None
}

/// Primary title source: the left-div content up to its image sibling,
/// with the nested link div cut out (it duplicates the destination URL,
/// not the human title).
fn item_title_left(item: &str) -> Option<String> {
    let at = html::after_class_marker(item, LEFT_CLASS, 0)?;

    // First `</div>` whose next element is the image div.
    let image_open = format!("<div class=\"{IMAGE_CLASS}\"");
    let mut pos = at;
    let end = loop {
        let close = item[pos..].find("</div>")? + pos;
        if item[close + "</div>".len()..].trim_start().starts_with(&image_open) {
            break close;
        }
        pos = close + "</div>".len();
    };

    let mut content = s!(&item[at..end]);
    if let Some((ls, le)) = link_div_span(&content) {
        content.replace_range(ls..le, "");
    }
    let text = html::strip_tags(&content);
    let text = text.trim();
    if text.is_empty() { None } else { Some(s!(text)) }
}

/// Span of the first link-classed div, open tag through its first close.
fn link_div_span(s: &str) -> Option<(usize, usize)> {
    let (start, open_end) = html::tag_open_with_class(s, "div", LINK_CLASS, 0)?;
    let close = s[open_end..].find("</div>")? + open_end + "</div>".len();
    Some((start, close))
}

/// Secondary title source: the div that directly follows the link div's
/// closing tag.
fn item_title_after_link(item: &str) -> Option<String> {
    let marker = format!("class=\"{LINK_CLASS}\"");
    let m = item.find(&marker)?;
    let close = item[m..].find("</div>")? + m + "</div>".len();
    let rest = item[close..].trim_start();
    if !rest.starts_with("<div") {
        return None;
    }
    let gt = rest.find('>')?;
    let end = rest[gt + 1..].find("</div>")? + gt + 1;
    let text = html::strip_tags(&rest[gt + 1..end]);
    let text = text.trim();
    if text.is_empty() { None } else { Some(s!(text)) }
}
