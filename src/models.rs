//! Data structures for invidplay
//!
//! Shared models used across the application:
//! - **Formats**: adaptive streams offered for a single video
//! - **Videos**: catalog records returned by the Invidious API
//! - **Catalog**: the ordered result list of the latest search

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Format Models
// =============================================================================

/// One adaptive (independently encoded) stream of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFormat {
    /// Direct stream URL (may redirect)
    pub url: String,
    /// Full MIME type, possibly with codec parameters
    /// (e.g. `audio/webm; codecs="opus"`)
    pub mime_type: String,
    /// Human readable quality ("1080p", "AUDIO_QUALITY_MEDIUM", ...)
    pub quality_label: String,
}

impl VideoFormat {
    pub fn new(
        url: impl Into<String>,
        mime_type: impl Into<String>,
        quality_label: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            quality_label: quality_label.into(),
        }
    }

    /// Audio streams are the only ones eligible for playback
    pub fn is_audio(&self) -> bool {
        self.mime_type.contains("audio")
    }

    /// MIME type without parameters, lowercased (`audio/webm`)
    pub fn essence(&self) -> String {
        mime_essence(&self.mime_type)
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mime_type, self.quality_label)
    }
}

/// Strip parameters such as `; codecs="opus"` and lowercase
pub fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

// =============================================================================
// Video Models
// =============================================================================

/// A video as known to the catalog
///
/// Search results carry only the summary fields; `formats` is populated
/// when the record is fetched by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub length_seconds: u64,
    pub view_count: u64,
    pub like_count: u64,
    pub rating: f32,
    pub formats: Vec<VideoFormat>,
}

impl VideoRecord {
    /// Format duration as `H:MM:SS` or `M:SS`
    pub fn format_length(&self) -> String {
        let hours = self.length_seconds / 3600;
        let mins = (self.length_seconds % 3600) / 60;
        let secs = self.length_seconds % 60;
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, mins, secs)
        } else {
            format!("{}:{:02}", mins, secs)
        }
    }

    /// Formats eligible for playback with their index in `formats`,
    /// in their original order
    pub fn audio_formats(&self) -> impl Iterator<Item = (usize, &VideoFormat)> {
        self.formats.iter().enumerate().filter(|(_, f)| f.is_audio())
    }

    /// Render the detail table shown by the `info` command
    pub fn details(&self) -> String {
        let rows = [
            ("Title:", self.title.clone()),
            ("Id:", self.id.clone()),
            ("Author:", self.author.clone()),
            ("Length (s):", self.length_seconds.to_string()),
            ("Views:", self.view_count.to_string()),
            ("Likes:", self.like_count.to_string()),
            ("Rating:", format!("{:.6}", self.rating)),
        ];
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

        let mut out = String::new();
        for (key, value) in rows {
            out.push_str(&format!("{:<width$} {}\n", key, value, width = width));
        }
        out.push_str("Description:\n");
        out.push_str(&self.description);
        out
    }
}

impl fmt::Display for VideoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.format_length())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered results of the most recent search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    videos: Vec<VideoRecord>,
}

impl Catalog {
    pub fn new(videos: Vec<VideoRecord>) -> Self {
        Self { videos }
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VideoRecord> {
        self.videos.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VideoRecord> {
        self.videos.iter()
    }
}

impl From<Vec<VideoRecord>> for Catalog {
    fn from(videos: Vec<VideoRecord>) -> Self {
        Self::new(videos)
    }
}

/// Render a numbered listing (`  N | TITLE`)
pub fn render_listing<'a>(videos: impl IntoIterator<Item = &'a VideoRecord>) -> String {
    let mut out = String::from("\n  N | TITLE\n");
    for (i, video) in videos.into_iter().enumerate() {
        out.push_str(&format!("{:3} {}\n", i, video.title));
    }
    out
}
