//! Query matching for archived page search.
//!
//! Every comparison runs on case-folded copies of the query and the field,
//! the stored text is never modified. Three modes are supported:
//!
//! - [`MatchMode::Phrase`]: the trimmed query is a contiguous substring.
//! - [`MatchMode::MultiTerm`]: every whitespace-separated term is a
//!   substring, in any order.
//! - [`MatchMode::WholeWord`]: the trimmed query occurs with a boundary
//!   character (or the edge of the field) on both sides.
//!
//! Word boundaries are approximated with a fixed character set, see
//! [`is_boundary`]. Letters, digits and anything outside the set never
//! delimit a word.

mod fold;

pub use fold::{FoldedText, fold_case};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Returns true for characters that delimit words in whole-word mode.
#[must_use]
pub const fn is_boundary(c: char) -> bool {
    matches!(
        c,
        ' ' | '.'
            | ','
            | ';'
            | ':'
            | '!'
            | '?'
            | '\n'
            | '\t'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '"'
            | '\''
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Phrase,
    WholeWord,
    MultiTerm,
}

impl MatchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phrase => "phrase",
            Self::WholeWord => "whole_word",
            Self::MultiTerm => "multi_term",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phrase" => Ok(Self::Phrase),
            "whole_word" | "whole-word" | "whole" => Ok(Self::WholeWord),
            "multi_term" | "multi-term" | "all_terms" | "all-terms" => Ok(Self::MultiTerm),
            other => Err(format!(
                "Unknown search mode '{other}'. Expected phrase, whole_word or multi_term"
            )),
        }
    }
}

/// A predicate over a single text field.
///
/// The record store evaluates it against the field selected by the caller.
pub trait TextPredicate: Send + Sync {
    fn matches(&self, text: &str) -> bool;
}

impl<F> TextPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, text: &str) -> bool {
        self(text)
    }
}

/// A compiled search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    mode: MatchMode,
    needles: Vec<String>,
}

impl Matcher {
    /// Compiles `query` for `mode`.
    ///
    /// Returns `None` when the query is empty after trimming, which callers
    /// treat as "no results".
    #[must_use]
    pub fn new(query: &str, mode: MatchMode) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let needles = match mode {
            MatchMode::MultiTerm => query.split_whitespace().map(fold_case).collect(),
            MatchMode::Phrase | MatchMode::WholeWord => vec![fold_case(query)],
        };

        Some(Self { mode, needles })
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        let haystack = fold_case(text);
        self.matches_folded(&haystack)
    }

    fn matches_folded(&self, haystack: &str) -> bool {
        match self.mode {
            MatchMode::Phrase => haystack.contains(self.needles[0].as_str()),
            MatchMode::MultiTerm => self
                .needles
                .iter()
                .all(|needle| haystack.contains(needle.as_str())),
            MatchMode::WholeWord => whole_word_occurrences(haystack, &self.needles[0])
                .next()
                .is_some(),
        }
    }

    /// Byte ranges of `text` covered by matches, sorted by start offset.
    ///
    /// Empty when the text does not match as a whole, so a multi-term query
    /// with a missing term reports nothing.
    #[must_use]
    pub fn match_spans(&self, text: &str) -> Vec<Range<usize>> {
        let folded = FoldedText::new(text);
        let haystack = folded.as_str();

        if !self.matches_folded(haystack) {
            return Vec::new();
        }

        let mut spans: Vec<Range<usize>> = match self.mode {
            MatchMode::WholeWord => whole_word_occurrences(haystack, &self.needles[0]).collect(),
            MatchMode::Phrase | MatchMode::MultiTerm => self
                .needles
                .iter()
                .flat_map(|needle| occurrences(haystack, needle))
                .collect(),
        };

        spans.sort_by_key(|span| (span.start, span.end));
        spans.dedup();

        spans
            .into_iter()
            .map(|span| folded.source_range(span))
            .collect()
    }
}

impl TextPredicate for Matcher {
    fn matches(&self, text: &str) -> bool {
        self.is_match(text)
    }
}

/// Every occurrence of `needle`, overlapping ones included.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = Range<usize>> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        if needle.is_empty() || from > haystack.len() {
            return None;
        }

        let start = from + haystack[from..].find(needle)?;
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
        Some(start..start + needle.len())
    })
}

/// Occurrences of `needle` delimited by a boundary or the edge of the text
/// on each side.
fn whole_word_occurrences<'a>(
    haystack: &'a str,
    needle: &'a str,
) -> impl Iterator<Item = Range<usize>> + 'a {
    occurrences(haystack, needle).filter(move |span| {
        let before = haystack[..span.start].chars().next_back();
        let after = haystack[span.end..].chars().next();
        before.is_none_or(is_boundary) && after.is_none_or(is_boundary)
    })
}
