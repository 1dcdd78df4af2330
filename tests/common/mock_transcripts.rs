/*!
 * Mock transcript provider for testing
 *
 * Serves canned transcripts from memory so no test touches the network.
 * Every call is recorded so tests can check caching and language handling.
 */

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use ytsumm::errors::TranscriptError;
use ytsumm::youtube::TranscriptProvider;

/// In-memory transcript provider
#[derive(Debug, Default)]
pub struct MockTranscriptProvider {
    transcripts: HashMap<String, String>,
    failure: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockTranscriptProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for `video_id` in every language
    pub fn with_transcript(mut self, video_id: &str, text: &str) -> Self {
        self.transcripts.insert(video_id.to_string(), text.to_string());
        self
    }

    /// Fail every call with a request error
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// (video id, language) of every call so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TranscriptProvider for MockTranscriptProvider {
    async fn get_transcript(&self, video_id: &str, language: &str) -> Result<String, TranscriptError> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), language.to_string()));

        if let Some(reason) = &self.failure {
            return Err(TranscriptError::RequestFailed(reason.clone()));
        }

        self.transcripts
            .get(video_id)
            .cloned()
            .ok_or_else(|| TranscriptError::NotAvailable {
                video_id: video_id.to_string(),
                reason: "no captions".to_string(),
            })
    }
}
