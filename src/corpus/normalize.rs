// Line normalization ahead of the selection tool.
//
// This is canonicalization only: blank-filler marking, whitespace collapse,
// trimming, and optional lowercasing. It does not tokenize.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Character wrapped around protected underscore runs.
pub const BLANK_MARKER: char = '@';

/// Two or more underscores preceded by whitespace (NBSP, the ASCII
/// information separators and friends included) or by the start of the line.
static BLANK_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(^|[\s\x{1C}-\x{1F}\x{85}\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}])(__+)",
    )
    .expect("blank filler pattern is valid")
});

/// Word separator used by normalization and vocabulary counting.
///
/// Unicode whitespace plus the ASCII information separators U+001C..U+001F,
/// which `char::is_whitespace` leaves out but the selection tooling treats
/// as spaces.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Normalize a single raw line.
pub fn normalize_line(raw: &str, lower: bool) -> String {
    let marked = BLANK_FILLER.replace_all(raw, "${1}@${2}@");

    // Dropping empty pieces collapses every separator run to one ASCII
    // space and strips both ends in one pass.
    let collapsed = marked
        .split(is_separator)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if lower {
        collapsed.to_lowercase()
    } else {
        collapsed
    }
}

/// Lazily normalize a sequence of raw lines, preserving length and order.
///
/// Accepts one-pass input such as `BufRead::lines()` output; the returned
/// iterator can then be consumed exactly once.
pub fn normalize_lines<I>(lines: I, lower: bool) -> impl Iterator<Item = String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .map(move |line| normalize_line(line.as_ref(), lower))
}
