//! Markdown link annotation over a source text.
//!
//! Keywords are applied in the order given. Every occurrence a keyword claims
//! is recorded as a byte range over the original text, and later keywords
//! skip anything overlapping a claimed range, so link text is never linked
//! again. Rendering happens once at the end.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};
use url::Url;

use super::matcher::{find_free_occurrences, keyword_pattern};
use crate::keyword::Keyword;

/// Markdown links as rendered by `annotate`.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[((?:\\.|[^\\\[\]])*)\]\([^()\s]*\)").unwrap());

struct LinkSpan {
    range: Range<usize>,
    url: Url,
}

/// Rewrite every case-insensitive whole-word occurrence of each resolved
/// keyword as `[matched text](url)`.
///
/// `resolve` is consulted once per keyword, in order. Keywords it maps to
/// `None` leave the text untouched.
pub fn annotate<F>(text: &str, keywords: &[Keyword], mut resolve: F) -> String
where
    F: FnMut(&Keyword) -> Option<Url>,
{
    let mut spans: Vec<LinkSpan> = Vec::new();

    for keyword in keywords {
        let Some(url) = resolve(keyword) else {
            continue;
        };

        let pattern = match keyword_pattern(keyword) {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping keyword '{}': {}", keyword, e);
                continue;
            }
        };

        let claimed: Vec<Range<usize>> = spans.iter().map(|s| s.range.clone()).collect();
        let found = find_free_occurrences(&pattern, text, &claimed);
        debug!("'{}' matched {} times", keyword, found.len());

        spans.extend(found.into_iter().map(|range| LinkSpan {
            range,
            url: url.clone(),
        }));
    }

    render(text, spans)
}

fn render(text: &str, mut spans: Vec<LinkSpan>) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    spans.sort_by_key(|s| s.range.start);

    let mut out = String::with_capacity(text.len() + spans.len() * 48);
    let mut last = 0;
    for span in &spans {
        out.push_str(&text[last..span.range.start]);
        out.push('[');
        push_escaped(&mut out, &text[span.range.clone()]);
        out.push_str("](");
        out.push_str(span.url.as_str());
        out.push(')');
        last = span.range.end;
    }
    out.push_str(&text[last..]);
    out
}

fn push_escaped(out: &mut String, link_text: &str) {
    for c in link_text.chars() {
        if matches!(c, '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
}

fn unescape(link_text: &str) -> String {
    let mut out = String::with_capacity(link_text.len());
    let mut chars = link_text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Remove the link markup `annotate` adds, leaving the visible text.
///
/// Intended for text whose source had no markdown links of its own.
pub fn strip_links(annotated: &str) -> String {
    LINK_PATTERN
        .replace_all(annotated, |caps: &Captures| unescape(&caps[1]))
        .into_owned()
}
