//! Keyword type and parsing of model responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A trimmed, non-empty term identified as salient in a text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Build a keyword from raw text, trimming surrounding whitespace.
    /// Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Keyword {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Keyword::parse(&value).ok_or_else(|| "keyword must not be empty".to_string())
    }
}

impl From<Keyword> for String {
    fn from(keyword: Keyword) -> Self {
        keyword.0
    }
}

/// Split a comma-separated model response into keywords.
///
/// Pieces are trimmed and empty pieces dropped. Order is kept as returned and
/// duplicates are not removed.
pub fn parse_keyword_list(response: &str) -> Vec<Keyword> {
    response.trim().split(',').filter_map(Keyword::parse).collect()
}
