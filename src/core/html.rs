// src/core/html.rs
//
// Marker-level HTML helpers. No DOM, no validation: the extractor keys on
// literal `class="..."` markers and first-match closing tags, which is
// what the target markup family actually requires. Case-sensitive.

/// Find the opening tag `<tag ... class="CLASS" ...>` at or after `from`.
/// Returns (tag_start, open_end) where `open_end` is the index just past `>`.
pub fn tag_open_with_class(
    s: &str,
    tag: &str,
    class: &str,
    from: usize,
) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let pat = format!("class=\"{class}\"");
    let mut pos = from;
    while let Some(rel) = s.get(pos..)?.find(&open) {
        let start = pos + rel;
        let gt = s[start..].find('>')? + start;
        if s[start..gt].contains(&pat) {
            return Some((start, gt + 1));
        }
        pos = start + open.len();
    }
    None
}

/// Inner content of the first `<tag ... class="CLASS" ...>` block,
/// up to the first `</tag>` (no nesting awareness, by design).
pub fn class_block<'a>(s: &'a str, tag: &str, class: &str) -> Option<&'a str> {
    let (_, open_end) = tag_open_with_class(s, tag, class, 0)?;
    let close = format!("</{tag}>");
    let end = s[open_end..].find(&close)? + open_end;
    Some(&s[open_end..end])
}

/// Split `inner` on every `<tag ... class="CLASS" ...>` marker.
/// Yields the segments *after* each marker; content before the first
/// marker is not a segment.
pub fn split_items<'a>(inner: &'a str, tag: &str, class: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut pos = match tag_open_with_class(inner, tag, class, 0) {
        Some((_, open_end)) => open_end,
        None => return out,
    };
    while let Some((start, open_end)) = tag_open_with_class(inner, tag, class, pos) {
        out.push(&inner[pos..start]);
        pos = open_end;
    }
    out.push(&inner[pos..]);
    out
}

/// Position just past the `>` of the first element carrying
/// `class="CLASS"`, searching from `from`.
pub fn after_class_marker(s: &str, class: &str, from: usize) -> Option<usize> {
    let pat = format!("class=\"{class}\"");
    let m = s.get(from..)?.find(&pat)? + from;
    let gt = s[m..].find('>')? + m;
    Some(gt + 1)
}

/// Value of `name="..."` inside the tag opening at `tag_start`.
/// Empty values are treated as absent.
pub fn tag_attr<'a>(s: &'a str, tag_start: usize, name: &str) -> Option<&'a str> {
    let gt = s.get(tag_start..)?.find('>')? + tag_start;
    let tag = &s[tag_start..gt];
    let pat = format!("{name}=\"");
    let a = tag.find(&pat)? + pat.len();
    let rest = &tag[a..];
    let q = rest.find('"')?;
    if q == 0 { return None; }
    Some(&rest[..q])
}

/// Immediate text content starting at `from`, up to the next `<`.
pub fn text_run<'a>(s: &'a str, from: usize) -> &'a str {
    match s[from..].find('<') {
        Some(i) => &s[from..from + i],
        None => &s[from..],
    }
}

/// Drop everything between `<` and `>`, keep the rest. Text is passed
/// through unmodified otherwise (no entity decoding, no ws collapsing).
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}
