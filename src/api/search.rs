//! Search endpoints.
//!
//! Parameters are read from the raw query string so that `tags` may be
//! repeated (`tags=a&tags=b`) as well as comma-separated (`tags=a,b`).

use axum::{
    Json,
    extract::{RawQuery, State},
};
use std::sync::Arc;

use super::validation::validate_limit;
use super::{ApiError, ApiResponse, AppState, SiteDto};
use crate::matching::MatchMode;
use crate::models::TAG_SEPARATOR;
use crate::services::SearchRequest;

#[derive(Debug, Default, PartialEq, Eq)]
struct SearchParams {
    query: String,
    limit: Option<usize>,
    mode: Option<MatchMode>,
    whole_word: bool,
    tags: Vec<String>,
}

impl SearchParams {
    fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "q" => params.query = value.into_owned(),
                "limit" => {
                    let limit = value.trim().parse().map_err(|_| {
                        ApiError::validation(format!("Invalid limit: '{value}'"))
                    })?;
                    params.limit = Some(limit);
                }
                "mode" => params.mode = Some(value.parse().map_err(ApiError::validation)?),
                "whole_word" => params.whole_word = parse_flag(&value)?,
                "tags" => params.tags.extend(
                    value
                        .split(TAG_SEPARATOR)
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string),
                ),
                _ => {}
            }
        }

        Ok(params)
    }

    /// An explicit `mode` wins over the older `whole_word` flag.
    fn match_mode(&self) -> MatchMode {
        match self.mode {
            Some(mode) => mode,
            None if self.whole_word => MatchMode::WholeWord,
            None => MatchMode::Phrase,
        }
    }
}

fn parse_flag(value: &str) -> Result<bool, ApiError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(ApiError::validation(format!(
            "Invalid boolean value: '{other}'"
        ))),
    }
}

async fn build_request(state: &AppState, raw: Option<&str>) -> Result<SearchRequest, ApiError> {
    let params = SearchParams::parse(raw)?;

    let (default_limit, max_limit) = {
        let config = state.config().read().await;
        (config.search.default_limit, config.search.max_limit)
    };
    let limit = validate_limit(params.limit.unwrap_or(default_limit), max_limit)?;

    Ok(SearchRequest::new(params.query.clone(), params.match_mode(), limit).with_tags(params.tags))
}

/// `GET /search_text`
///
/// Searches the extracted text of every saved page, newest first.
pub async fn search_text(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<Vec<SiteDto>>>, ApiError> {
    let request = build_request(&state, raw.as_deref()).await?;
    let sites = state.search_service().search_content(&request).await?;
    Ok(Json(ApiResponse::success(
        sites.into_iter().map(SiteDto::from).collect(),
    )))
}

/// `GET /search_title`
pub async fn search_title(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<Vec<SiteDto>>>, ApiError> {
    let request = build_request(&state, raw.as_deref()).await?;
    let sites = state.search_service().search_titles(&request).await?;
    Ok(Json(ApiResponse::success(
        sites.into_iter().map(SiteDto::from).collect(),
    )))
}
