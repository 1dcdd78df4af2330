/*!
 * Tool catalogue and dispatch.
 *
 * Every tool replies with a JSON object carrying a `success` flag. Failures of
 * the underlying operation are reported in-band (`"success": false`) so the
 * client can show them; only malformed calls surface as protocol errors.
 */

use log::{debug, warn};
use serde_json::{json, Map, Value};

use crate::app_config::LengthPreset;
use crate::app_controller::Controller;
use crate::errors::{AppError, ToolError};
use crate::youtube::{MetadataExtractor, ThumbnailQuality};

use super::protocol::{CallToolParams, ToolDefinition, ToolResult};
use super::rate_limit::RateLimiter;

pub const GET_TRANSCRIPT: &str = "get_transcript";
pub const SUMMARIZE_VIDEO: &str = "summarize_video";
pub const SUMMARIZE_TEXT: &str = "summarize_text";
pub const EXTRACT_KEY_POINTS: &str = "extract_key_points";
pub const GET_VIDEO_METADATA: &str = "get_video_metadata";

/// Dispatches tool calls to the controller
#[derive(Debug)]
pub struct ToolRegistry {
    controller: Controller,
    limiter: Option<RateLimiter>,
}

impl ToolRegistry {
    pub fn new(controller: Controller) -> Self {
        let limiter = RateLimiter::from_config(&controller.config().rate_limit);
        Self { controller, limiter }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Tools advertised by `tools/list`
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let config = self.controller.config();
        let languages = config.transcript.supported_languages.join(", ");
        let presets: Vec<&str> = LengthPreset::ALL.iter().map(|p| p.as_str()).collect();

        let language_schema = json!({
            "type": "string",
            "description": format!(
                "Transcript language code (default: {}; commonly available: {})",
                config.transcript.default_language, languages
            ),
        });
        let url_schema = json!({
            "type": "string",
            "description": "YouTube video URL or 11 character video ID",
        });
        let length_schema = json!({
            "type": "string",
            "enum": presets,
            "description": format!("Summary length (default: {})", config.summary.default_length),
        });

        vec![
            ToolDefinition {
                name: GET_TRANSCRIPT.to_string(),
                description: "Get the transcript of a YouTube video".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "video_url": url_schema, "language": language_schema },
                    "required": ["video_url"],
                }),
            },
            ToolDefinition {
                name: SUMMARIZE_VIDEO.to_string(),
                description: "Summarize a YouTube video from its transcript".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "video_url": url_schema,
                        "summary_length": length_schema,
                        "language": language_schema,
                    },
                    "required": ["video_url"],
                }),
            },
            ToolDefinition {
                name: SUMMARIZE_TEXT.to_string(),
                description: "Summarize arbitrary text with the extractive summarizer".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "text": { "type": "string", "description": "Text to summarize" },
                        "summary_length": length_schema,
                        "ratio": {
                            "type": "number",
                            "minimum": 0.0,
                            "maximum": 1.0,
                            "description": "Fraction of sentences to keep, overrides summary_length",
                        },
                    },
                    "required": ["text"],
                }),
            },
            ToolDefinition {
                name: EXTRACT_KEY_POINTS.to_string(),
                description: "Extract the most important sentences of a YouTube video".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "video_url": url_schema,
                        "num_points": {
                            "type": "integer",
                            "description": format!(
                                "Number of key points (default: {})",
                                config.summary.default_key_points
                            ),
                        },
                        "language": language_schema,
                    },
                    "required": ["video_url"],
                }),
            },
            ToolDefinition {
                name: GET_VIDEO_METADATA.to_string(),
                description: "Get title, channel, duration and view count of a YouTube video".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "video_url": url_schema },
                    "required": ["video_url"],
                }),
            },
        ]
    }

    /// Run a tool call
    ///
    /// Unknown tools, bad arguments and rate limiting are returned as
    /// `ToolError`; operation failures become an error payload.
    pub async fn call(&self, params: CallToolParams) -> Result<ToolResult, ToolError> {
        if let Some(limiter) = &self.limiter {
            limiter.try_acquire().map_err(|wait| ToolError::RateLimited {
                retry_after_secs: wait.as_secs().max(1),
            })?;
        }

        debug!("Calling tool '{}'", params.name);
        let args = &params.arguments;

        let outcome = match params.name.as_str() {
            GET_TRANSCRIPT => self.get_transcript(args).await?,
            SUMMARIZE_VIDEO => self.summarize_video(args).await?,
            SUMMARIZE_TEXT => self.summarize_text(args)?,
            EXTRACT_KEY_POINTS => self.extract_key_points(args).await?,
            GET_VIDEO_METADATA => self.get_video_metadata(args).await?,
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        Ok(match outcome {
            Ok(payload) => ToolResult::json(&payload, false),
            Err((context, e)) => {
                warn!("Tool '{}' failed: {}", params.name, e);
                ToolResult::json(
                    &json!({ "success": false, "error": format!("{}: {}", context, e) }),
                    true,
                )
            }
        })
    }

    async fn get_transcript(&self, args: &Map<String, Value>) -> Result<Outcome, ToolError> {
        let video_url = required_str(args, "video_url")?;
        let language = optional_str(args, "language")?;

        Ok(self
            .controller
            .get_transcript(video_url, language)
            .await
            .map(|transcript| json!({ "success": true, "transcript": transcript }))
            .map_err(|e| ("Failed to fetch transcript", e)))
    }

    async fn summarize_video(&self, args: &Map<String, Value>) -> Result<Outcome, ToolError> {
        let video_url = required_str(args, "video_url")?;
        let length = optional_str(args, "summary_length")?;
        let language = optional_str(args, "language")?;

        Ok(self
            .controller
            .summarize_video(video_url, length, language)
            .await
            .map(|summary| {
                json!({
                    "success": true,
                    "video_id": summary.video_id,
                    "summary": summary.summary,
                    "length": summary.length.as_str(),
                })
            })
            .map_err(|e| ("Failed to summarize video", e)))
    }

    fn summarize_text(&self, args: &Map<String, Value>) -> Result<Outcome, ToolError> {
        let text = required_str(args, "text")?;
        let length = optional_str(args, "summary_length")?;
        let ratio = optional_f64(args, "ratio")?;
        let generator = self.controller.generator();

        let result = match (ratio, length) {
            (Some(ratio), _) => generator.generate_summary(text, ratio),
            (None, Some(length)) => generator.generate_summary_with_length(text, length),
            (None, None) => generator.generate_default_summary(text),
        };

        Ok(result
            .map(|summary| json!({ "success": true, "summary": summary }))
            .map_err(|e| ("Failed to summarize text", AppError::from(e))))
    }

    async fn extract_key_points(&self, args: &Map<String, Value>) -> Result<Outcome, ToolError> {
        let video_url = required_str(args, "video_url")?;
        let language = optional_str(args, "language")?;
        // Zero or negative counts fall back to the default
        let num_points = optional_i64(args, "num_points")?
            .filter(|n| *n > 0)
            .map(|n| n as usize);

        Ok(self
            .controller
            .extract_key_points(video_url, num_points, language)
            .await
            .map(|points| json!({ "success": true, "count": points.len(), "key_points": points }))
            .map_err(|e| ("Failed to extract key points", e)))
    }

    async fn get_video_metadata(&self, args: &Map<String, Value>) -> Result<Outcome, ToolError> {
        let video_url = required_str(args, "video_url")?;

        Ok(self
            .controller
            .get_video_metadata(video_url)
            .await
            .map(|metadata| {
                json!({
                    "success": true,
                    "metadata": MetadataExtractor::format_metadata(&metadata),
                    "thumbnail_url": MetadataExtractor::thumbnail_url(&metadata.video_id, ThumbnailQuality::High),
                    "details": metadata,
                })
            })
            .map_err(|e| ("Failed to get metadata", e)))
    }
}

/// Payload of a successful call, or a context message and the failure
type Outcome = Result<Value, (&'static str, AppError)>;

fn required_str<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str, ToolError> {
    optional_str(args, key)?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("'{}' is required", key)))
}

fn optional_str<'a>(args: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(ToolError::InvalidArguments(format!("'{}' must be a string", key))),
    }
}

fn optional_i64(args: &Map<String, Value>, key: &str) -> Result<Option<i64>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{}' must be an integer", key))),
    }
}

fn optional_f64(args: &Map<String, Value>, key: &str) -> Result<Option<f64>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{}' must be a number", key))),
    }
}
