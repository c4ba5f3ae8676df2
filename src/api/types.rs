use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::models::Site;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDto {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,
    pub saved_path: String,
    /// RFC 3339, UTC.
    pub created_at: String,
}

impl From<Site> for SiteDto {
    fn from(site: Site) -> Self {
        let tags = site.tag_list();
        Self {
            id: site.id,
            url: site.url,
            title: site.title,
            tags,
            content: site.content,
            saved_path: site.saved_path,
            created_at: site.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub id: i32,
    pub status: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlResponse {
    pub url: String,
}
