// src/scrape/mod.rs
mod adventar;
// Future platforms slot in here with their own marker grammar.

pub use adventar::{parse_document, Extraction};
