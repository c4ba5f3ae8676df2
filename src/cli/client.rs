//! HTTP client for a running Recall server.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::api::{ApiResponse, SaveRequest, SaveResponse, SiteDto, UrlResponse};
use crate::matching::MatchMode;
use crate::models::TextField;

pub struct ApiClient {
    client: Client,
    server_url: String,
}

impl ApiClient {
    pub fn new(server_url: &str) -> Result<Self> {
        // No overall timeout: a save waits for the server to finish archiving.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Recall-CLI/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    #[must_use]
    pub fn page_url(&self, id: i32) -> String {
        format!("{}/page/{id}", self.server_url)
    }

    #[must_use]
    pub fn search_url(
        &self,
        field: TextField,
        query: &str,
        mode: MatchMode,
        limit: Option<usize>,
        tags: &[String],
    ) -> String {
        let endpoint = match field {
            TextField::Content => "search_text",
            TextField::Title => "search_title",
        };

        let mut url = format!(
            "{}/{endpoint}?q={}&mode={mode}",
            self.server_url,
            urlencoding::encode(query)
        );
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={limit}"));
        }
        for tag in tags {
            url.push_str(&format!("&tags={}", urlencoding::encode(tag)));
        }
        url
    }

    pub async fn search(
        &self,
        field: TextField,
        query: &str,
        mode: MatchMode,
        limit: Option<usize>,
        tags: &[String],
    ) -> Result<Vec<SiteDto>> {
        let url = self.search_url(field, query, mode, limit, tags);
        debug!(%url, "Searching");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.server_url))?;
        decode(response).await
    }

    pub async fn save(&self, url: &str, tags: &[String]) -> Result<SaveResponse> {
        let request = SaveRequest {
            url: url.to_string(),
            tags: tags.to_vec(),
        };

        let response = self
            .client
            .post(format!("{}/save", self.server_url))
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.server_url))?;
        decode(response).await
    }

    pub async fn get_original_url(&self, id: i32) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/get_url?id={id}", self.server_url))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.server_url))?;
        let body: UrlResponse = decode(response).await?;
        Ok(body.url)
    }
}

/// Unwraps the `{"success", "data", "error"}` envelope.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read server response")?;

    let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
        anyhow!("Unexpected response from server (HTTP {status}): {e}: {body}")
    })?;

    match envelope {
        ApiResponse {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        ApiResponse { error, .. } => Err(anyhow!(
            "Server returned HTTP {status}: {}",
            error.unwrap_or_else(|| "no error message".to_string())
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        let url = client.search_url(
            TextField::Content,
            "hello world",
            MatchMode::WholeWord,
            Some(5),
            &["news".to_string(), "c++".to_string()],
        );
        assert_eq!(
            url,
            "http://localhost:8000/search_text?q=hello%20world&mode=whole_word&limit=5&tags=news&tags=c%2B%2B"
        );

        let url = client.search_url(TextField::Title, "rust", MatchMode::Phrase, None, &[]);
        assert_eq!(url, "http://localhost:8000/search_title?q=rust&mode=phrase");
    }

    #[test]
    fn test_page_url() {
        let client = ApiClient::new("http://archive.lan:9000").unwrap();
        assert_eq!(client.page_url(12), "http://archive.lan:9000/page/12");
    }
}
