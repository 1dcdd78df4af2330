/*!
 * Error types for the ytsumm application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::fmt;
use thiserror::Error;

/// Processing stage of a summarization request
///
/// Used to tag internal faults with the point at which they occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStage {
    Validating,
    Tokenizing,
    Scoring,
    Selecting,
}

impl fmt::Display for SummaryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Tokenizing => "tokenizing",
            Self::Scoring => "scoring",
            Self::Selecting => "selecting",
        };
        write!(f, "{}", name)
    }
}

/// Errors that can occur while summarizing text
#[derive(Error, Debug)]
pub enum SummaryError {
    /// Input text was empty or whitespace only
    #[error("Input text cannot be empty")]
    EmptyInput,

    /// Ratio outside of [0.0, 1.0]
    #[error("Ratio must be between 0.0 and 1.0, got {0}")]
    InvalidRatio(f64),

    /// Length preset not one of short, medium or long
    #[error("Invalid length '{0}'. Must be one of short, medium, long")]
    InvalidLength(String),

    /// Unexpected internal fault, cause preserved
    #[error("Summarization failed while {stage}: {source}")]
    SummarizationFailed {
        /// Stage at which the fault was raised
        stage: SummaryStage,
        /// Original cause
        #[source]
        source: anyhow::Error,
    },
}

impl SummaryError {
    /// Wrap an arbitrary cause as an internal fault
    pub fn failed(stage: SummaryStage, source: impl Into<anyhow::Error>) -> Self {
        Self::SummarizationFailed {
            stage,
            source: source.into(),
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::SummarizationFailed { .. })
    }
}

/// Errors that can occur when retrieving transcripts
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The input could not be parsed as a YouTube URL or video id
    #[error("Could not extract video ID from: {0}")]
    InvalidUrl(String),

    /// The requested language code is not a valid ISO 639 code
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    /// The video has no transcript in any usable language
    #[error("No transcript available for video {video_id}: {reason}")]
    NotAvailable {
        /// YouTube video id
        video_id: String,
        /// Why no transcript could be selected
        reason: String,
    },

    /// The HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be parsed
    #[error("Failed to parse transcript response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for TranscriptError {
    fn from(error: reqwest::Error) -> Self {
        Self::RequestFailed(error.to_string())
    }
}

/// Errors that can occur when extracting video metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The input could not be parsed as a YouTube URL or video id
    #[error("Could not extract video ID from: {0}")]
    InvalidUrl(String),

    /// Failed to build the HTTP client or read the page
    #[error("Failed to extract metadata: {0}")]
    ExtractionFailed(String),
}

/// Errors raised by the tool server while dispatching a call
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool name is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments missing or of the wrong type
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Too many requests in the current window
    #[error("Rate limit exceeded: retry in {retry_after_secs}s")]
    RateLimited {
        /// Seconds until a slot frees up
        retry_after_secs: u64,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from summarization
    #[error("Summary error: {0}")]
    Summary(#[from] SummaryError),

    /// Error from transcript retrieval
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Error from metadata extraction
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Error from tool dispatch
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
