//! Plain-text metrics over editor HTML.

use regex::Regex;
use std::sync::OnceLock;

fn block_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)</(?:p|div|h[1-6]|li|blockquote|pre|tr)>|<br\s*/?>").unwrap()
    })
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

/// Strip markup from editor HTML, keeping a space at block boundaries so
/// adjacent paragraphs do not fuse into one word.
pub fn plain_text(html: &str) -> String {
    let spaced = block_boundary().replace_all(html, " ");
    let stripped = any_tag().replace_all(&spaced, "");
    stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Whitespace-delimited word count of the document's visible text.
pub fn word_count(html: &str) -> usize {
    plain_text(html).split_whitespace().count()
}

/// Character count of the visible text, whitespace excluded at the edges.
pub fn char_count(html: &str) -> usize {
    plain_text(html).trim().chars().count()
}
