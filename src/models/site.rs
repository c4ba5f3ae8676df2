use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tags::split_tags;

/// Title stored when a page has no `<title>` element.
pub const NO_TITLE: &str = "No title";

/// One archived page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: i32,

    pub url: String,

    pub title: String,

    /// Normalized, comma-joined tag list.
    pub tags: String,

    pub content: String,

    pub saved_path: String,

    pub created_at: DateTime<Utc>,
}

impl Site {
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}

/// Input for creating a [`Site`]. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSite {
    pub url: String,

    pub title: String,

    pub tags: Vec<String>,

    pub content: String,

    pub saved_path: String,
}

/// The text field a search scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Content,
    Title,
}

impl TextField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
