/*!
 * Transcript retrieval from YouTube videos.
 *
 * The watch page embeds a `captionTracks` list; each track has a timed-text
 * URL returning XML segments. The retriever layers URL parsing, language
 * validation and caching on top of a pluggable provider.
 */

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use super::cache::TranscriptCache;
use super::video_id::extract_video_id;
use crate::app_config::{CacheConfig, TranscriptConfig};
use crate::errors::TranscriptError;
use crate::language_utils::{language_codes_match, validate_language_code};

static SEGMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(?:text|p)\b[^>]*>(.*?)</(?:text|p)>").unwrap());
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap());

/// Source of plain-text transcripts
#[async_trait]
pub trait TranscriptProvider: Send + Sync + Debug {
    /// Fetch the transcript of a video in the given language
    async fn get_transcript(&self, video_id: &str, language: &str) -> Result<String, TranscriptError>;
}

/// A caption track advertised on the watch page
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    /// Timed-text URL
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    /// BCP 47 language tag of the track
    #[serde(rename = "languageCode")]
    pub language_code: String,

    /// "asr" for auto-generated tracks
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Transcript provider scraping the public watch page
#[derive(Debug, Clone)]
pub struct YouTubeTranscriptProvider {
    client: Client,
    user_agent: String,
    fallback_to_any_language: bool,
}

impl YouTubeTranscriptProvider {
    pub fn new(config: &TranscriptConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            user_agent: config.user_agent.clone(),
            fallback_to_any_language: config.fallback_to_any_language,
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, TranscriptError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptError::RequestFailed(format!("{} returned HTTP {}", url, status)));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptProvider for YouTubeTranscriptProvider {
    async fn get_transcript(&self, video_id: &str, language: &str) -> Result<String, TranscriptError> {
        info!("Fetching transcript for video: {}", video_id);

        let html = self
            .fetch_text(&format!("https://www.youtube.com/watch?v={}", video_id))
            .await?;
        let tracks = parse_caption_tracks(&html, video_id)?;
        debug!(
            "Found {} caption tracks: {}",
            tracks.len(),
            tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>().join(", ")
        );

        let track = choose_track(&tracks, language, self.fallback_to_any_language).ok_or_else(|| {
            TranscriptError::NotAvailable {
                video_id: video_id.to_string(),
                reason: format!("no transcript in '{}'", language),
            }
        })?;

        if !language_codes_match(&track.language_code, language) {
            warn!(
                "Could not fetch transcript in {} for {}. Using {} instead",
                language, video_id, track.language_code
            );
        }

        let xml = self.fetch_text(&track.base_url).await?;
        let transcript = parse_timed_text(&xml);
        info!(
            "Successfully fetched transcript in {} for {} ({} chars)",
            track.language_code,
            video_id,
            transcript.len()
        );

        Ok(transcript)
    }
}

/// Extract the caption track list embedded in a watch page
pub fn parse_caption_tracks(html: &str, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    const MARKER: &str = "\"captionTracks\":";

    let Some(position) = html.find(MARKER) else {
        let reason = if html.contains("\"playabilityStatus\":{\"status\":\"ERROR\"") {
            "video is unavailable"
        } else {
            "transcripts are disabled for this video"
        };
        return Err(TranscriptError::NotAvailable {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        });
    };

    let mut deserializer = serde_json::Deserializer::from_str(&html[position + MARKER.len()..]);
    let tracks = Vec::<CaptionTrack>::deserialize(&mut deserializer)
        .map_err(|e| TranscriptError::ParseError(format!("caption track list: {}", e)))?;

    if tracks.is_empty() {
        return Err(TranscriptError::NotAvailable {
            video_id: video_id.to_string(),
            reason: "caption track list is empty".to_string(),
        });
    }

    Ok(tracks)
}

/// Pick the best track for a language
///
/// Order: manual exact tag, manual same language, generated same language,
/// then (with fallback) the first manual track or any track.
pub fn choose_track<'a>(tracks: &'a [CaptionTrack], language: &str, fallback: bool) -> Option<&'a CaptionTrack> {
    let wanted = language.trim();
    let manual = || tracks.iter().filter(|t| !t.is_generated());

    manual()
        .find(|t| t.language_code.eq_ignore_ascii_case(wanted))
        .or_else(|| manual().find(|t| language_codes_match(&t.language_code, wanted)))
        .or_else(|| {
            tracks
                .iter()
                .find(|t| t.is_generated() && language_codes_match(&t.language_code, wanted))
        })
        .or_else(|| {
            if fallback {
                manual().next().or_else(|| tracks.first())
            } else {
                None
            }
        })
}

/// Turn timed-text XML into newline separated plain text
pub fn parse_timed_text(xml: &str) -> String {
    SEGMENT_PATTERN
        .captures_iter(xml)
        .filter_map(|cap| cap.get(1))
        .map(|segment| {
            // Segment bodies are escaped twice: once as XML, once as HTML
            let text = decode_entities(&decode_entities(segment.as_str()));
            TAG_PATTERN.replace_all(&text, "").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode the named entities YouTube emits plus numeric references
pub fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Transcript retrieval with URL parsing, validation and caching
#[derive(Debug, Clone)]
pub struct TranscriptRetriever {
    provider: Arc<dyn TranscriptProvider>,
    cache: TranscriptCache,
    default_language: String,
}

impl TranscriptRetriever {
    /// Create a retriever backed by YouTube
    pub fn new(config: &TranscriptConfig, cache: &CacheConfig) -> Self {
        Self::with_provider(
            Arc::new(YouTubeTranscriptProvider::new(config)),
            TranscriptCache::new(cache.enabled, Duration::from_secs(cache.ttl_secs)),
            &config.default_language,
        )
    }

    /// Create a retriever around any provider
    pub fn with_provider(provider: Arc<dyn TranscriptProvider>, cache: TranscriptCache, default_language: &str) -> Self {
        Self {
            provider,
            cache,
            default_language: default_language.to_string(),
        }
    }

    pub fn cache(&self) -> &TranscriptCache {
        &self.cache
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Get the transcript for a URL or video id
    pub async fn get_transcript(&self, video_url: &str, language: Option<&str>) -> Result<String, TranscriptError> {
        let video_id = extract_video_id(video_url)?;
        info!("Extracted video ID: {}", video_id);

        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.default_language.as_str());
        validate_language_code(language).map_err(|_| TranscriptError::InvalidLanguage(language.to_string()))?;

        if let Some(transcript) = self.cache.get(&video_id, language) {
            return Ok(transcript);
        }

        let transcript = self.provider.get_transcript(&video_id, language).await?;
        if !transcript.trim().is_empty() {
            self.cache.store(&video_id, language, &transcript);
        }

        Ok(transcript)
    }
}
