/*!
 * YouTube collaborators of the summarizer.
 *
 * - `video_id`: URL and id parsing
 * - `transcript`: transcript providers and the caching retriever
 * - `cache`: in-memory transcript cache with TTL
 * - `metadata`: title, channel and counters from the watch page
 */

pub mod cache;
pub mod metadata;
pub mod transcript;
pub mod video_id;

pub use cache::TranscriptCache;
pub use metadata::{MetadataExtractor, ThumbnailQuality, VideoMetadata};
pub use transcript::{TranscriptProvider, TranscriptRetriever, YouTubeTranscriptProvider};
pub use video_id::extract_video_id;
