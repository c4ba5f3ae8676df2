use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use super::{ExtractedPage, PageExtractor};
use crate::config::ArchiveConfig;
use crate::models::NO_TITLE;

/// Wide enough that ordinary paragraphs are never wrapped, which would put
/// line breaks inside phrases.
const TEXT_WIDTH: usize = 65_536;

/// Fetches pages over HTTP and extracts their title and readable text.
#[derive(Clone)]
pub struct HttpPageExtractor {
    client: Client,
}

impl HttpPageExtractor {
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageExtractor for HttpPageExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Fetching {url} returned HTTP {status}");
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))?;

        debug!(url, bytes = html.len(), "Fetched page for extraction");
        extract_page(&html)
    }
}

pub fn extract_page(html: &str) -> Result<ExtractedPage> {
    let title = extract_title(html).unwrap_or_else(|| NO_TITLE.to_string());
    let text = html2text::config::plain()
        .string_from_read(html.as_bytes(), TEXT_WIDTH)
        .map_err(|e| anyhow!("Failed to extract page text: {e}"))?;

    Ok(ExtractedPage { title, text })
}

/// Text of the first `<title>` element, entities decoded and whitespace
/// collapsed. `None` when missing or blank.
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("Invalid regex")
    });

    let raw = re.captures(html)?.get(1)?.as_str();
    let decoded = html_escape::decode_html_entities(raw);
    let title = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if title.is_empty() { None } else { Some(title) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = "<html><head><TITLE lang=\"en\">\n  Rust &amp; Friends\n</TITLE></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Rust & Friends"));
    }

    #[test]
    fn test_missing_or_blank_title() {
        assert_eq!(extract_title("<html><body>hi</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
    }

    #[test]
    fn test_extract_page_defaults_title() {
        let page = extract_page("<html><body><p>Just a body</p></body></html>").unwrap();
        assert_eq!(page.title, NO_TITLE);
        assert!(page.text.contains("Just a body"));
    }

    #[test]
    fn test_extract_page_strips_markup() {
        let html = r"<html><head><title>Cats</title></head>
            <body><h1>About</h1><p>The cat sat on the mat.</p></body></html>";
        let page = extract_page(html).unwrap();

        assert_eq!(page.title, "Cats");
        assert!(page.text.contains("The cat sat on the mat."));
        assert!(!page.text.contains("<p>"));
    }
}
