// File: modlink-core/src/modmail/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]\n]*)\]\([^)\n]*\)").expect("link pattern is valid")
});
static BOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^\n]+?)\*\*").expect("bold pattern is valid")
});
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([^`\n]+)`").expect("inline code pattern is valid")
});

/// Strips markdown links, bold markers and inline code markers, keeping the
/// text they wrap, and trims the result.
///
/// Each rewrite removes characters, so repeating the pass until nothing
/// changes always terminates, and the output is a fixed point.
pub fn normalize(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let next = rewrite_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn rewrite_once(text: &str) -> String {
    // Links first: labels can carry their own emphasis.
    let unlinked = LINK.replace_all(text, "$1");
    let unbolded = BOLD.replace_all(&unlinked, "$1");
    let uncoded = INLINE_CODE.replace_all(&unbolded, "$1");
    uncoded.trim().to_string()
}
