/*!
 * Tests for error types and conversions
 */

use std::error::Error;

use anyhow::anyhow;
use ytsumm::errors::{AppError, MetadataError, SummaryError, SummaryStage, ToolError, TranscriptError};

#[test]
fn test_summaryError_callerErrors_shouldDisplayCorrectly() {
    assert_eq!(SummaryError::EmptyInput.to_string(), "Input text cannot be empty");

    let display = SummaryError::InvalidRatio(1.5).to_string();
    assert!(display.contains("between 0.0 and 1.0"));
    assert!(display.contains("1.5"));

    let display = SummaryError::InvalidLength("tiny".to_string()).to_string();
    assert!(display.contains("tiny"));
    assert!(display.contains("short, medium, long"));
}

#[test]
fn test_summaryError_failed_shouldKeepStageAndCause() {
    let error = SummaryError::failed(SummaryStage::Scoring, anyhow!("table overflow"));

    assert!(!error.is_caller_error());
    assert!(error.to_string().contains("while scoring"));
    assert!(error.to_string().contains("table overflow"));
    assert_eq!(error.source().map(|s| s.to_string()), Some("table overflow".to_string()));
}

#[test]
fn test_summaryError_isCallerError_shouldCoverValidationVariants() {
    assert!(SummaryError::EmptyInput.is_caller_error());
    assert!(SummaryError::InvalidRatio(-0.1).is_caller_error());
    assert!(SummaryError::InvalidLength("x".to_string()).is_caller_error());
}

#[test]
fn test_transcriptError_notAvailable_shouldDisplayVideoAndReason() {
    let error = TranscriptError::NotAvailable {
        video_id: "dQw4w9WgXcQ".to_string(),
        reason: "captions disabled".to_string(),
    };
    let display = error.to_string();

    assert!(display.contains("dQw4w9WgXcQ"));
    assert!(display.contains("captions disabled"));
}

#[test]
fn test_appError_fromModuleErrors_shouldWrapWithPrefix() {
    let app: AppError = SummaryError::EmptyInput.into();
    assert!(matches!(app, AppError::Summary(SummaryError::EmptyInput)));
    assert_eq!(app.to_string(), "Summary error: Input text cannot be empty");

    let app: AppError = TranscriptError::InvalidUrl("nope".to_string()).into();
    assert!(app.to_string().starts_with("Transcript error:"));

    let app: AppError = MetadataError::ExtractionFailed("timeout".to_string()).into();
    assert!(app.to_string().starts_with("Metadata error:"));

    let app: AppError = ToolError::RateLimited { retry_after_secs: 30 }.into();
    assert!(app.to_string().contains("retry in 30s"));
}

#[test]
fn test_appError_fromAnyhowAndIo_shouldConvert() {
    let app: AppError = anyhow!("boom").into();
    assert!(matches!(app, AppError::Unknown(ref msg) if msg == "boom"));

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
    let app: AppError = io.into();
    assert!(matches!(app, AppError::File(ref msg) if msg.contains("missing.txt")));
}
