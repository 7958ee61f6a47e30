//! Invidious API client
//!
//! Search and video lookup against an Invidious instance.
//! API docs: https://docs.invidious.io/api/

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{VideoFormat, VideoRecord};

/// Default public instance
pub const DEFAULT_INSTANCE: &str = "https://inv.nadeko.net";

/// Catalog lookup error types
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Video not found (404)")]
    NotFound,

    #[error("Instance returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl LookupError {
    /// Whether the failure happened before any response was parsed
    pub fn is_network(&self) -> bool {
        matches!(self, LookupError::Request(_) | LookupError::Status(_))
    }
}

/// Invidious API client
pub struct InvidiousClient {
    base_url: String,
    client: reqwest::Client,
}

impl InvidiousClient {
    /// Create a client for a specific instance (also used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, LookupError> {
        let url = format!("{}/api/v1{}", self.base_url, endpoint);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| LookupError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(LookupError::NotFound),
            status => Err(LookupError::Status(status.as_u16())),
        }
    }

    /// Search videos by free text
    pub async fn search(&self, query: &str) -> Result<Vec<VideoRecord>, LookupError> {
        let endpoint = format!("/search?q={}&type=video", urlencoding::encode(query));
        let items: Vec<SearchItemRaw> = self.get(&endpoint).await?;
        Ok(items
            .into_iter()
            .filter_map(SearchItemRaw::into_record)
            .collect())
    }

    /// Fetch a video with its adaptive formats
    pub async fn video(&self, id: &str) -> Result<VideoRecord, LookupError> {
        if id.is_empty() {
            return Err(LookupError::InvalidResponse("empty video id".into()));
        }
        let endpoint = format!("/videos/{}", urlencoding::encode(id));
        let raw: VideoRaw = self.get(&endpoint).await?;
        Ok(raw.into_record())
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemRaw {
    #[serde(rename = "type")]
    kind: String,
    video_id: Option<String>,
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    length_seconds: Option<u64>,
    view_count: Option<u64>,
}

impl SearchItemRaw {
    fn into_record(self) -> Option<VideoRecord> {
        // Channels and playlists can still appear in results
        if self.kind != "video" {
            return None;
        }
        let id = self.video_id.filter(|id| !id.is_empty())?;

        Some(VideoRecord {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            length_seconds: self.length_seconds.unwrap_or(0),
            view_count: self.view_count.unwrap_or(0),
            ..Default::default()
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRaw {
    video_id: String,
    title: String,
    description: Option<String>,
    author: Option<String>,
    length_seconds: Option<u64>,
    view_count: Option<u64>,
    like_count: Option<u64>,
    rating: Option<f32>,
    #[serde(default)]
    adaptive_formats: Vec<FormatRaw>,
}

impl VideoRaw {
    fn into_record(self) -> VideoRecord {
        VideoRecord {
            id: self.video_id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            length_seconds: self.length_seconds.unwrap_or(0),
            view_count: self.view_count.unwrap_or(0),
            like_count: self.like_count.unwrap_or(0),
            rating: self.rating.unwrap_or(0.0),
            formats: self
                .adaptive_formats
                .into_iter()
                .filter_map(FormatRaw::into_format)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormatRaw {
    url: Option<String>,
    #[serde(rename = "type")]
    mime_type: Option<String>,
    quality_label: Option<String>,
    // Audio formats carry no qualityLabel
    audio_quality: Option<String>,
}

impl FormatRaw {
    fn into_format(self) -> Option<VideoFormat> {
        let url = self.url.filter(|u| !u.is_empty())?;
        Some(VideoFormat {
            url,
            mime_type: self.mime_type.unwrap_or_default(),
            quality_label: self
                .quality_label
                .or(self.audio_quality)
                .unwrap_or_default(),
        })
    }
}
