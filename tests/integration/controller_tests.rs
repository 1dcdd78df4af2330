/*!
 * Integration tests for the application controller
 */

use std::sync::Arc;

use anyhow::Result;
use ytsumm::app_config::{Config, LengthPreset};
use ytsumm::app_controller::Controller;
use ytsumm::errors::{AppError, SummaryError, TranscriptError};

use crate::common::{self, MockTranscriptProvider, ANIMALS_TEXT, VIDEO_ID};

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;

    assert_eq!(controller.config().summary.default_length, LengthPreset::Medium);
    assert_eq!(controller.generator().strategy().name(), "frequency");
    assert_eq!(controller.retriever().default_language(), "en");
    Ok(())
}

/// Blocking callers can drive the controller without their own runtime
#[test]
fn test_get_transcript_withBlockingRuntime_shouldReturnTranscript() -> Result<()> {
    let (controller, provider) = common::mock_controller();

    let transcript = tokio_test::block_on(controller.get_transcript(VIDEO_ID, Some("en-US")))?;

    assert_eq!(transcript, ANIMALS_TEXT);
    assert_eq!(provider.calls()[0].1, "en-US");
    Ok(())
}

#[tokio::test]
async fn test_summarize_video_withDefaultLength_shouldUseMediumPreset() -> Result<()> {
    let (controller, _provider) = common::mock_controller();

    let summary = controller.summarize_video(VIDEO_ID, None, None).await?;

    assert_eq!(summary.video_id, VIDEO_ID);
    assert_eq!(summary.length, LengthPreset::Medium);
    assert_eq!(common::sentences_of(&summary.summary).len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_summarize_video_withUrlAndPreset_shouldMatchDirectSummary() -> Result<()> {
    let (controller, _provider) = common::mock_controller();
    let url = format!("https://www.youtube.com/watch?v={}", VIDEO_ID);

    let summary = controller.summarize_video(&url, Some("long"), Some("en")).await?;
    let direct = controller.generator().generate_summary(ANIMALS_TEXT, 0.5)?;

    assert_eq!(summary.summary, direct);
    assert_eq!(summary.length, LengthPreset::Long);
    Ok(())
}

#[tokio::test]
async fn test_summarize_video_withInvalidLength_shouldFailWithoutFetching() {
    let (controller, provider) = common::mock_controller();

    let result = controller.summarize_video(VIDEO_ID, Some("huge"), None).await;

    assert!(matches!(result, Err(AppError::Summary(SummaryError::InvalidLength(_)))));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_summarize_video_with_ratio_shouldHonorRatio() -> Result<()> {
    let (controller, _provider) = common::mock_controller();

    let summary = controller.summarize_video_with_ratio(VIDEO_ID, 1.0, None).await?;
    assert_eq!(summary, ANIMALS_TEXT);

    let result = controller.summarize_video_with_ratio(VIDEO_ID, 2.0, None).await;
    assert!(matches!(result, Err(AppError::Summary(SummaryError::InvalidRatio(_)))));
    Ok(())
}

#[tokio::test]
async fn test_extract_key_points_withoutCount_shouldUseConfiguredDefault() -> Result<()> {
    let mut config = common::test_config();
    config.summary.default_key_points = 4;
    let (controller, _provider) = common::mock_controller_with(config);

    assert_eq!(controller.extract_key_points(VIDEO_ID, None, None).await?.len(), 4);
    assert_eq!(controller.extract_key_points(VIDEO_ID, Some(0), None).await?.len(), 4);
    assert_eq!(controller.extract_key_points(VIDEO_ID, Some(2), None).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_repeated_requests_shouldHitTranscriptCache() -> Result<()> {
    let (controller, provider) = common::mock_controller();

    controller.summarize_video(VIDEO_ID, Some("short"), None).await?;
    controller.extract_key_points(VIDEO_ID, Some(3), None).await?;
    controller.get_transcript(VIDEO_ID, None).await?;

    assert_eq!(provider.call_count(), 1);
    let (hits, _, _) = controller.retriever().cache().stats();
    assert_eq!(hits, 2);
    Ok(())
}

#[tokio::test]
async fn test_get_transcript_withEmptyTranscript_shouldBeNotAvailable() {
    let provider = Arc::new(MockTranscriptProvider::new().with_transcript(VIDEO_ID, "   "));
    let controller = Controller::with_provider(common::test_config(), provider);

    let result = controller.get_transcript(VIDEO_ID, None).await;

    assert!(matches!(
        result,
        Err(AppError::Transcript(TranscriptError::NotAvailable { .. }))
    ));
}

#[tokio::test]
async fn test_provider_failure_shouldPropagateAsTranscriptError() {
    let provider = Arc::new(MockTranscriptProvider::failing("connection reset"));
    let controller = Controller::with_provider(Config::default(), provider);

    let err = controller.summarize_video(VIDEO_ID, None, None).await.unwrap_err();

    assert!(matches!(err, AppError::Transcript(TranscriptError::RequestFailed(_))));
    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn test_get_video_metadata_withInvalidUrl_shouldFail() {
    let (controller, _provider) = common::mock_controller();

    let result = controller.get_video_metadata("https://example.com/nothing").await;

    assert!(matches!(result, Err(AppError::Metadata(_))));
}
