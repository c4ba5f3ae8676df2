use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_site_id;
use super::{
    ApiError, ApiResponse, AppState, SaveRequest, SaveResponse, SiteDto, UrlResponse,
};

/// Snapshots are third-party pages served from our origin, so they may load
/// their own inlined assets but never run scripts.
const SNAPSHOT_CSP: &str = "default-src 'none'; img-src data: blob:; style-src 'unsafe-inline' data:; font-src data:; media-src data: blob:; sandbox";

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub id: i32,
}

/// `POST /save`
///
/// Archives the page and records it. Responds once the record exists.
pub async fn save_site(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<ApiResponse<SaveResponse>>, ApiError> {
    let site = state
        .archive_service()
        .save(&request.url, &request.tags)
        .await?;

    Ok(Json(ApiResponse::success(SaveResponse {
        id: site.id,
        status: "ok".to_string(),
        title: site.title,
    })))
}

/// `GET /sites/{id}`
pub async fn get_site(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SiteDto>>, ApiError> {
    let id = validate_site_id(id)?;
    let site = state.archive_service().get_site(id).await?;
    Ok(Json(ApiResponse::success(SiteDto::from(site))))
}

/// `GET /get_url?id=`
pub async fn get_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UrlQuery>,
) -> Result<Json<ApiResponse<UrlResponse>>, ApiError> {
    let id = validate_site_id(query.id)?;
    let url = state.archive_service().get_original_url(id).await?;
    Ok(Json(ApiResponse::success(UrlResponse { url })))
}

/// `GET /page/{id}`
///
/// Serves the archived HTML snapshot.
pub async fn get_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let id = validate_site_id(id)?;
    let html = state.archive_service().read_snapshot(id).await?;

    let mut response = html.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(SNAPSHOT_CSP),
    );

    Ok(response)
}
