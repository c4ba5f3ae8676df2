//! Tag normalization and tag filters.
//!
//! Tags are stored as one comma-joined string. Storage keeps the spelling
//! the user typed, every comparison is case-insensitive.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::matching::fold_case;

pub const TAG_SEPARATOR: char = ',';

/// Normalizes user supplied tags into the stored representation.
///
/// Tags are trimmed, split on embedded commas, blanks are dropped and
/// case-insensitive duplicates removed (first spelling wins). Order is kept.
#[must_use]
pub fn normalize_tags<I, S>(tags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized: Vec<String> = Vec::new();

    for tag in tags {
        for part in tag.as_ref().split(TAG_SEPARATOR) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if seen.insert(fold_case(part)) {
                normalized.push(part.to_string());
            }
        }
    }

    normalized.join(&TAG_SEPARATOR.to_string())
}

/// Splits a stored tag string back into its tags.
#[must_use]
pub fn split_tags(stored: &str) -> Vec<String> {
    stored
        .split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// How a requested tag is compared against a record's tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatch {
    /// The requested tag equals one of the record's tags.
    #[default]
    Token,
    /// The requested tag occurs anywhere in the stored tag string, so "ne"
    /// matches "news".
    Substring,
}

/// A conjunction of tag conditions: a record passes only if every requested
/// tag is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    mode: TagMatch,
    wanted: Vec<String>,
}

impl TagFilter {
    /// Builds a filter from raw request values. Blank values are ignored.
    #[must_use]
    pub fn new<I, S>(mode: TagMatch, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted = tags
            .into_iter()
            .map(|t| fold_case(t.as_ref().trim()))
            .filter(|t| !t.is_empty())
            .collect();

        Self { mode, wanted }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wanted.is_empty()
    }

    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        if self.wanted.is_empty() {
            return true;
        }

        let stored = fold_case(stored);
        match self.mode {
            TagMatch::Substring => self.wanted.iter().all(|t| stored.contains(t.as_str())),
            TagMatch::Token => {
                let tokens: Vec<&str> = stored.split(TAG_SEPARATOR).map(str::trim).collect();
                self.wanted.iter().all(|t| tokens.contains(&t.as_str()))
            }
        }
    }
}
