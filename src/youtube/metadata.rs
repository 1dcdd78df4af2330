/*!
 * Video metadata extraction from the public watch page.
 *
 * No API key is needed: title, channel and counters are read from the JSON
 * blobs embedded in the page. Network failures degrade to placeholder
 * metadata instead of failing the call.
 */

use std::time::Duration;

use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::video_id::extract_video_id;
use crate::app_config::TranscriptConfig;
use crate::errors::MetadataError;

// JSON string body allowing escaped quotes
const JSON_STRING: &str = r#""((?:[^"\\]|\\.)*)""#;

static TITLE: Lazy<Vec<Regex>> = Lazy::new(|| {
    field_patterns(&[
        r#""videoDetails":\{"videoId":"[^"]*","title":"#,
        r#"<meta name="title" content="#,
        r#""title":"#,
    ])
});
static CHANNEL: Lazy<Vec<Regex>> = Lazy::new(|| {
    field_patterns(&[r#""ownerChannelName":"#, r#""author":"#, r#""shortBylineText":\{"simpleText":"#])
});
static VIEWS: Lazy<Vec<Regex>> =
    Lazy::new(|| field_patterns(&[r#""viewCount":"#, r#""viewCountText":\{"simpleText":"#]));
static UPLOAD_DATE: Lazy<Vec<Regex>> = Lazy::new(|| field_patterns(&[r#""uploadDate":"#, r#""publishDate":"#]));
static DESCRIPTION: Lazy<Vec<Regex>> = Lazy::new(|| field_patterns(&[r#""shortDescription":"#]));
static LENGTH_SECONDS: Lazy<Regex> = Lazy::new(|| Regex::new(r#""lengthSeconds":"(\d+)""#).unwrap());

fn field_patterns(prefixes: &[&str]) -> Vec<Regex> {
    prefixes
        .iter()
        .map(|prefix| Regex::new(&format!("{}{}", prefix, JSON_STRING)).unwrap())
        .collect()
}

/// Basic information about a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    /// Duration in seconds
    pub duration: Option<u64>,
    pub view_count: Option<String>,
    pub upload_date: Option<String>,
    pub description: String,
}

impl VideoMetadata {
    /// Placeholder returned when the page could not be fetched
    pub fn unavailable(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: "Unable to retrieve".to_string(),
            channel: "Unknown".to_string(),
            duration: None,
            view_count: None,
            upload_date: None,
            description: "Metadata could not be retrieved".to_string(),
        }
    }
}

/// Thumbnail resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailQuality {
    /// 120x90
    Standard,
    /// 320x180
    Medium,
    /// 480x360
    #[default]
    High,
    /// 1280x720 when available
    MaxRes,
}

impl ThumbnailQuality {
    /// Parse "sd", "mq", "hq" or "maxres", defaulting to high quality
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "sd" => Self::Standard,
            "mq" => Self::Medium,
            "maxres" => Self::MaxRes,
            _ => Self::High,
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            Self::Standard => "default",
            Self::Medium => "mqdefault",
            Self::High => "hqdefault",
            Self::MaxRes => "maxresdefault",
        }
    }
}

/// Metadata extractor
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    client: Client,
    user_agent: String,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(&TranscriptConfig::default())
    }
}

impl MetadataExtractor {
    pub fn new(config: &TranscriptConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Extract the video id from a URL or bare id
    pub fn extract_video_id(video_url: &str) -> Result<String, MetadataError> {
        extract_video_id(video_url).map_err(|_| MetadataError::InvalidUrl(video_url.to_string()))
    }

    /// Fetch metadata for a video id
    ///
    /// Returns placeholder metadata when the page cannot be fetched.
    pub async fn get_basic_metadata(&self, video_id: &str) -> Result<VideoMetadata, MetadataError> {
        info!("Extracting metadata for video: {}", video_id);

        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let response = match self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Failed to fetch page for {}: HTTP {}", video_id, response.status());
                return Ok(VideoMetadata::unavailable(video_id));
            }
            Err(e) => {
                error!("Failed to fetch page for {}: {}", video_id, e);
                return Ok(VideoMetadata::unavailable(video_id));
            }
        };

        let html = response
            .text()
            .await
            .map_err(|e| MetadataError::ExtractionFailed(e.to_string()))?;

        let metadata = Self::extract_from_html(&html, video_id);
        info!("Successfully extracted metadata for {}", video_id);
        Ok(metadata)
    }

    /// Fetch metadata for a URL or bare id
    pub async fn get_metadata(&self, video_url: &str) -> Result<VideoMetadata, MetadataError> {
        let video_id = Self::extract_video_id(video_url)?;
        self.get_basic_metadata(&video_id).await
    }

    /// Read metadata fields out of a watch page
    pub fn extract_from_html(html: &str, video_id: &str) -> VideoMetadata {
        VideoMetadata {
            video_id: video_id.to_string(),
            title: first_match(&TITLE, html).unwrap_or_else(|| "Unknown".to_string()),
            channel: first_match(&CHANNEL, html).unwrap_or_else(|| "Unknown".to_string()),
            duration: LENGTH_SECONDS
                .captures(html)
                .and_then(|caps| caps[1].parse().ok()),
            view_count: first_match(&VIEWS, html),
            upload_date: first_match(&UPLOAD_DATE, html),
            description: first_match(&DESCRIPTION, html).unwrap_or_else(|| "N/A".to_string()),
        }
    }

    /// Thumbnail URL for a video
    pub fn thumbnail_url(video_id: &str, quality: ThumbnailQuality) -> String {
        format!("https://img.youtube.com/vi/{}/{}.jpg", video_id, quality.file_stem())
    }

    /// Format metadata as readable "Key: value" lines
    pub fn format_metadata(metadata: &VideoMetadata) -> String {
        let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());

        [
            format!("Video ID: {}", metadata.video_id),
            format!("Title: {}", metadata.title),
            format!("Channel: {}", metadata.channel),
            format!("Duration: {}", metadata.duration.map(format_duration).unwrap_or_else(|| "N/A".to_string())),
            format!("Views: {}", or_na(&metadata.view_count)),
            format!("Upload Date: {}", or_na(&metadata.upload_date)),
            format!("Description: {}", metadata.description),
        ]
        .join("\n")
    }
}

/// Seconds as `h:mm:ss` or `m:ss`
pub fn format_duration(seconds: u64) -> String {
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

fn first_match(patterns: &[Regex], html: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        let raw = pattern.captures(html)?.get(1)?.as_str();
        // Embedded values are JSON string bodies; fall back to the raw text
        let value = serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string());
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    })
}
