//! Terminal output for client commands.

use chrono::DateTime;
use colored::Colorize;
use std::ops::Range;

use crate::api::SiteDto;
use crate::matching::Matcher;

/// Snippets shown per result.
pub const MAX_SNIPPETS: usize = 5;

/// Words of context on each side of a match.
pub const CONTEXT_WORDS: usize = 10;

/// A window of words around one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// The window's words joined by single spaces.
    pub text: String,

    /// Sorted, non-overlapping byte ranges of `text` to highlight.
    pub highlights: Vec<Range<usize>>,

    /// Words were cut before the window.
    pub truncated_start: bool,

    /// Words were cut after the window.
    pub truncated_end: bool,
}

impl Snippet {
    /// The snippet with `...` on cut edges and every match highlighted.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.truncated_start {
            out.push_str(&"...".dimmed().to_string());
        }

        let mut cursor = 0;
        for range in &self.highlights {
            out.push_str(&self.text[cursor..range.start]);
            out.push_str(&self.text[range.clone()].red().bold().to_string());
            cursor = range.end;
        }
        out.push_str(&self.text[cursor..]);

        if self.truncated_end {
            out.push_str(&"...".dimmed().to_string());
        }
        out
    }
}

/// Prints results oldest first so the newest ends up next to the prompt.
pub fn print_results(results: &[SiteDto], matcher: Option<&Matcher>, server_url: &str) {
    for site in results.iter().rev() {
        print_site(site, matcher, server_url);
        println!();
    }
}

pub fn print_no_results(query: &str, tags: &[String]) {
    let tag_info = if tags.is_empty() {
        String::new()
    } else {
        format!(" with tags [{}]", tags.join(", "))
    };
    println!(
        "No results found for query: {}{}",
        query.yellow(),
        tag_info.dimmed()
    );
}

fn print_site(site: &SiteDto, matcher: Option<&Matcher>, server_url: &str) {
    println!("{}", format_timestamp(&site.created_at).dimmed());
    println!(
        "ID: {}, {}",
        site.id.to_string().bright_cyan(),
        site.url.bright_green().bold()
    );
    println!(
        "{} • {}",
        site.title.bright_blue().bold(),
        format!("{server_url}/page/{}", site.id).bright_purple().bold()
    );
    if !site.tags.is_empty() {
        println!("Tags: {}", site.tags.join(", ").dimmed());
    }

    if let Some(matcher) = matcher {
        for snippet in snippets(&site.content, matcher, MAX_SNIPPETS, CONTEXT_WORDS) {
            println!("  {}", snippet.render());
        }
    }
}

/// Renders an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS`, falling back to
/// the raw value.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// One snippet for each of the first `max` matches in `text`.
///
/// A snippet holds the word containing the match plus `context` words on
/// either side. Every match inside that window is highlighted, so nearby
/// matches show up in more than one snippet.
#[must_use]
pub fn snippets(text: &str, matcher: &Matcher, max: usize, context: usize) -> Vec<Snippet> {
    let words = word_ranges(text);
    if words.is_empty() {
        return Vec::new();
    }

    let spans = matcher.match_spans(text);

    spans
        .iter()
        .take(max)
        .map(|span| {
            let index = words
                .partition_point(|w| w.end <= span.start)
                .min(words.len() - 1);
            let start = index.saturating_sub(context);
            let end = (index + context + 1).min(words.len());
            window(text, &words[start..end], &spans, start > 0, end < words.len())
        })
        .collect()
}

/// Joins `words` into a [`Snippet`], mapping the `spans` that touch them onto
/// the joined text.
fn window(
    text: &str,
    words: &[Range<usize>],
    spans: &[Range<usize>],
    truncated_start: bool,
    truncated_end: bool,
) -> Snippet {
    let mut joined = String::new();
    let mut offsets = Vec::with_capacity(words.len());
    for word in words {
        if !joined.is_empty() {
            joined.push(' ');
        }
        offsets.push(joined.len());
        joined.push_str(&text[word.clone()]);
    }

    let mut highlights: Vec<Range<usize>> = Vec::new();
    for span in spans {
        // Pieces of the span inside each word, in joined-text offsets. A span
        // crossing whitespace keeps the joining spaces highlighted.
        let mut pieces = words.iter().zip(&offsets).filter_map(|(word, &offset)| {
            let lo = span.start.max(word.start);
            let hi = span.end.min(word.end);
            (lo < hi).then(|| offset + lo - word.start..offset + hi - word.start)
        });

        let Some(first) = pieces.next() else {
            continue;
        };
        let range = first.start..pieces.last().map_or(first.end, |last| last.end);

        match highlights.last_mut() {
            Some(prev) if range.start <= prev.end => prev.end = prev.end.max(range.end),
            _ => highlights.push(range),
        }
    }

    Snippet {
        text: joined,
        highlights,
        truncated_start,
        truncated_end,
    }
}

/// Byte ranges of the whitespace-separated words of `text`.
fn word_ranges(text: &str) -> Vec<Range<usize>> {
    let mut words = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                words.push(s..i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push(s..text.len());
    }

    words
}
