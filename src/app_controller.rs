use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;

use crate::app_config::{Config, LengthPreset};
use crate::errors::{AppError, TranscriptError};
use crate::summarization::SummaryGenerator;
use crate::youtube::{MetadataExtractor, TranscriptProvider, TranscriptRetriever, TranscriptCache, VideoMetadata};

/// Main application controller
///
/// Owns one instance of every collaborator, built from the configuration
/// once at startup. Clones share the same collaborators.
#[derive(Debug, Clone)]
pub struct Controller {
    config: Arc<Config>,
    retriever: TranscriptRetriever,
    generator: SummaryGenerator,
    metadata: MetadataExtractor,
}

/// A summary together with the preset it was generated with
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSummary {
    pub video_id: String,
    pub summary: String,
    pub length: LengthPreset,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let retriever = TranscriptRetriever::new(&config.transcript, &config.cache);
        let generator = SummaryGenerator::new(&config.summary);
        let metadata = MetadataExtractor::new(&config.transcript);

        Ok(Self::with_components(config, retriever, generator, metadata))
    }

    /// Create a controller that reads transcripts from a custom provider
    pub fn with_provider(config: Config, provider: Arc<dyn TranscriptProvider>) -> Self {
        let cache = TranscriptCache::new(
            config.cache.enabled,
            std::time::Duration::from_secs(config.cache.ttl_secs),
        );
        let retriever = TranscriptRetriever::with_provider(provider, cache, &config.transcript.default_language);
        let generator = SummaryGenerator::new(&config.summary);
        let metadata = MetadataExtractor::new(&config.transcript);

        Self::with_components(config, retriever, generator, metadata)
    }

    pub fn with_components(
        config: Config,
        retriever: TranscriptRetriever,
        generator: SummaryGenerator,
        metadata: MetadataExtractor,
    ) -> Self {
        Self {
            config: Arc::new(config),
            retriever,
            generator,
            metadata,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn generator(&self) -> &SummaryGenerator {
        &self.generator
    }

    pub fn retriever(&self) -> &TranscriptRetriever {
        &self.retriever
    }

    /// Fetch a non-empty transcript
    pub async fn get_transcript(&self, video_url: &str, language: Option<&str>) -> Result<String, AppError> {
        info!("Getting transcript for: {}", video_url);
        let transcript = self.retriever.get_transcript(video_url, language).await?;

        if transcript.trim().is_empty() {
            return Err(TranscriptError::NotAvailable {
                video_id: crate::youtube::extract_video_id(video_url)?,
                reason: "transcript is empty".to_string(),
            }
            .into());
        }

        debug!("Transcript has {} characters", transcript.len());
        Ok(transcript)
    }

    /// Summarize a video with a length preset, or the configured default
    pub async fn summarize_video(
        &self,
        video_url: &str,
        length: Option<&str>,
        language: Option<&str>,
    ) -> Result<VideoSummary, AppError> {
        info!("Summarizing video: {}", video_url);

        // Reject a bad preset before hitting the network
        let length = match length {
            Some(name) => name.parse::<LengthPreset>()?,
            None => self.config.summary.default_length,
        };

        let transcript = self.get_transcript(video_url, language).await?;
        let summary = self.generator.generate_summary_with_preset(&transcript, length)?;

        Ok(VideoSummary {
            video_id: crate::youtube::extract_video_id(video_url)?,
            summary,
            length,
        })
    }

    /// Summarize a video keeping a fixed ratio of its sentences
    pub async fn summarize_video_with_ratio(
        &self,
        video_url: &str,
        ratio: f64,
        language: Option<&str>,
    ) -> Result<String, AppError> {
        let transcript = self.get_transcript(video_url, language).await?;
        Ok(self.generator.generate_summary(&transcript, ratio)?)
    }

    /// Extract ranked key points from a video
    ///
    /// `num_points` of `None` or zero falls back to the configured default.
    pub async fn extract_key_points(
        &self,
        video_url: &str,
        num_points: Option<usize>,
        language: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        info!("Extracting key points from: {}", video_url);

        let num_points = self.resolve_num_points(num_points);
        let transcript = self.get_transcript(video_url, language).await?;
        Ok(self.generator.extract_key_points(&transcript, num_points)?)
    }

    /// Fetch video metadata
    pub async fn get_video_metadata(&self, video_url: &str) -> Result<VideoMetadata, AppError> {
        info!("Getting metadata for: {}", video_url);
        Ok(self.metadata.get_metadata(video_url).await?)
    }

    /// Number of key points to extract for an optional request value
    pub fn resolve_num_points(&self, requested: Option<usize>) -> usize {
        requested
            .filter(|n| *n > 0)
            .unwrap_or(self.config.summary.default_key_points)
    }
}
