//! Small, independent text helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Cleans a string for single-line contexts: drops backslashes, turns double
/// quotes into single quotes, and collapses every whitespace run (including
/// newlines and tabs) into one space, trimming the ends.
pub fn sanitize(source: &str) -> String {
    let cleaned = source.replace('\\', "").replace('"', "'");
    WHITESPACE_RUN.replace_all(&cleaned, " ").trim().to_string()
}

/// Extracts the segments of `source` separated by `mark`.
///
/// The mark itself is not part of any segment; a string ending with the mark
/// yields a trailing empty segment. An empty mark yields the whole string.
pub fn split_on_mark(source: &str, mark: &str) -> Vec<String> {
    if mark.is_empty() {
        return vec![source.to_string()];
    }
    source.split(mark).map(String::from).collect()
}

/// Returns the first substring of `source` between `from` and `to`.
pub fn between<'a>(source: &'a str, from: &str, to: &str) -> Option<&'a str> {
    let start = source.find(from)? + from.len();
    let end = start + source[start..].find(to)?;
    Some(&source[start..end])
}

/// Locates `probe` in `origin` and returns the element at the same position
/// in `destination`.
pub fn positional<'a>(probe: &str, origin: &[&str], destination: &'a [&'a str]) -> Option<&'a str> {
    let pos = origin.iter().position(|elem| *elem == probe)?;
    destination.get(pos).copied()
}

/// Returns the byte position of the first whitespace character.
pub fn find_whitespace(source: &str) -> Option<usize> {
    source
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(pos, _)| pos)
}

/// Replaces up to `count` rightmost occurrences of `from` with `to`.
pub fn rreplace(source: &str, from: &str, to: &str, count: usize) -> String {
    if from.is_empty() || count == 0 {
        return source.to_string();
    }
    let mut result = source.to_string();
    let mut end = result.len();
    for _ in 0..count {
        let Some(pos) = result[..end].rfind(from) else {
            break;
        };
        result.replace_range(pos..pos + from.len(), to);
        end = pos;
    }
    result
}

/// Returns the longest prefix of `source` holding at most `max` grapheme
/// clusters, never splitting a cluster.
pub fn truncate_graphemes(source: &str, max: usize) -> &str {
    match source.grapheme_indices(true).nth(max) {
        Some((pos, _)) => &source[..pos],
        None => source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_whitespace_and_quotes() {
        assert_eq!(
            sanitize("  say \"hi\"\tto\n\nthe \\world  "),
            "say 'hi' to the world"
        );
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn split_on_mark_keeps_trailing_empty_segment() {
        assert_eq!(split_on_mark("a::b::", "::"), vec!["a", "b", ""]);
        assert_eq!(split_on_mark("plain", "::"), vec!["plain"]);
        assert_eq!(split_on_mark("abc", ""), vec!["abc"]);
    }

    #[test]
    fn between_finds_first_delimited_span() {
        assert_eq!(between("k=[v] rest", "[", "]"), Some("v"));
        assert_eq!(between("no markers", "[", "]"), None);
        assert_eq!(between("open [ only", "[", "]"), None);
        assert_eq!(between("[]", "[", "]"), Some(""));
    }

    #[test]
    fn positional_maps_between_lists() {
        let origin = ["a", "b", "c"];
        let destination = ["x", "y"];
        assert_eq!(positional("b", &origin, &destination), Some("y"));
        assert_eq!(positional("c", &origin, &destination), None);
        assert_eq!(positional("d", &origin, &destination), None);
    }

    #[test]
    fn find_whitespace_returns_byte_position() {
        assert_eq!(find_whitespace("ab cd"), Some(2));
        assert_eq!(find_whitespace("tab\there"), Some(3));
        assert_eq!(find_whitespace("none"), None);
    }

    #[test]
    fn rreplace_works_from_the_right() {
        assert_eq!(rreplace("a-b-c-d", "-", "+", 2), "a-b+c+d");
        assert_eq!(rreplace("a-b", "-", "+", 5), "a+b");
        assert_eq!(rreplace("abc", "", "+", 3), "abc");
    }

    #[test]
    fn truncate_respects_grapheme_clusters() {
        assert_eq!(truncate_graphemes("hello", 3), "hel");
        assert_eq!(truncate_graphemes("hi", 10), "hi");
        // family emoji is a single cluster of several code points
        let s = "a\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466}b";
        assert_eq!(truncate_graphemes(s, 2), "a\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466}");
    }
}
