use std::sync::OnceLock;

use regex::Regex;

fn numbered_item() -> &'static Regex {
    static NUMBERED_ITEM: OnceLock<Regex> = OnceLock::new();
    NUMBERED_ITEM.get_or_init(|| Regex::new(r"^\s*\d+\.\s*(.+)$").expect("pattern is valid"))
}

/// Pull numbered items ("1. Foo?") out of free-form text, at most `count` of
/// them, in order. Lines that don't match the numbering pattern are ignored
/// entirely, including unnumbered continuation lines. Finding fewer than
/// `count` items is not an error; the shorter list is returned as-is.
pub fn extract_numbered(text: &str, count: usize) -> Vec<String> {
    text.lines()
        .filter_map(|line| numbered_item().captures(line))
        .map(|caps| caps[1].to_string())
        .take(count)
        .collect()
}
