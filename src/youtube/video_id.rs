/*!
 * YouTube video id extraction.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::TranscriptError;

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

/// Whether the input already is a bare 11 character video id
pub fn is_video_id(input: &str) -> bool {
    VIDEO_ID.is_match(input)
}

/// Extract the video id from a URL or bare id
///
/// Accepts `youtube.com/watch?v=`, `youtu.be/`, and the `/embed/`,
/// `/shorts/`, `/live/` and `/v/` path forms, with or without scheme.
pub fn extract_video_id(input: &str) -> Result<String, TranscriptError> {
    let input = input.trim();
    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{}", input)))
        .map_err(|_| TranscriptError::InvalidUrl(input.to_string()))?;

    let host = url.host_str().unwrap_or_default().to_lowercase();
    let host = host
        .trim_start_matches("www.")
        .trim_start_matches("m.")
        .trim_start_matches("music.");

    let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if host == "youtube.com" || host == "youtube-nocookie.com" {
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("embed" | "shorts" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    candidate
        .filter(|id| is_video_id(id))
        .ok_or_else(|| TranscriptError::InvalidUrl(input.to_string()))
}
