//! Case-insensitive whole-word occurrence search.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::keyword::Keyword;

/// Word characters: Unicode alphanumerics and underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Compile a literal, case-insensitive pattern for a keyword.
pub fn keyword_pattern(keyword: &Keyword) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(keyword.as_str()))
        .case_insensitive(true)
        .build()
}

/// True when the span is not glued to a word character on either side.
fn is_word_bounded(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Byte offset of the character after the one starting at `pos`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// Find every whole-word occurrence of `pattern` in `text` that does not
/// overlap any range in `claimed`.
///
/// A rejected candidate only advances the search by one character, so a
/// valid occurrence starting inside a rejected one is still found.
pub fn find_free_occurrences(
    pattern: &Regex,
    text: &str,
    claimed: &[Range<usize>],
) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(m) = pattern.find_at(text, pos) else {
            break;
        };
        let range = m.range();

        let free = !claimed.iter().any(|c| overlaps(c, &range));
        if !range.is_empty() && free && is_word_bounded(text, &range) {
            pos = range.end;
            found.push(range);
        } else {
            pos = next_char_boundary(text, range.start);
        }
    }

    found
}
