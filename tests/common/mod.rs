/*!
 * Common test utilities for the ytsumm test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use ytsumm::app_config::Config;
use ytsumm::app_controller::Controller;

// Re-export the mock provider module
pub mod mock_transcripts;

pub use mock_transcripts::MockTranscriptProvider;

/// Six sentence document used across the summarization tests
pub const ANIMALS_TEXT: &str = "The quick brown fox jumps over the lazy dog. \
This is a test sentence about animals. \
Dogs are known for their loyalty and intelligence. \
Foxes are clever animals found in many parts of the world. \
The lazy dog is resting under the tree. \
Many animals live in the forest and jungle.";

/// A valid video id served by the mock provider
pub const VIDEO_ID: &str = "dQw4w9WgXcQ";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs through env_logger, controlled by RUST_LOG
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Test configuration: no rate limiting, caching on
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.rate_limit.enabled = false;
    config
}

/// Controller serving `ANIMALS_TEXT` for `VIDEO_ID` from a mock provider
pub fn mock_controller() -> (Controller, Arc<MockTranscriptProvider>) {
    mock_controller_with(test_config())
}

pub fn mock_controller_with(config: Config) -> (Controller, Arc<MockTranscriptProvider>) {
    init_logging();
    let provider = Arc::new(MockTranscriptProvider::new().with_transcript(VIDEO_ID, ANIMALS_TEXT));
    let controller = Controller::with_provider(config, provider.clone());
    (controller, provider)
}

/// Split a summary back into its sentences
pub fn sentences_of(summary: &str) -> Vec<String> {
    ytsumm::summarization::split_sentences(summary)
        .into_iter()
        .map(|sentence| sentence.text)
        .collect()
}
