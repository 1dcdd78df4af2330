use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::SummaryError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Summarization settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Transcript retrieval settings
    #[serde(default)]
    pub transcript: TranscriptConfig,

    /// Transcript caching
    #[serde(default)]
    pub cache: CacheConfig,

    /// Tool call rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Tool server identity
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Summary length preset
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreset {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthPreset {
    /// All presets, shortest first
    pub const ALL: [LengthPreset; 3] = [Self::Short, Self::Medium, Self::Long];

    // @returns: Lowercase preset identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl std::fmt::Display for LengthPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LengthPreset {
    type Err = SummaryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            _ => Err(SummaryError::InvalidLength(s.to_string())),
        }
    }
}

/// Summarization settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SummaryConfig {
    /// Length used when the caller names none
    #[serde(default)]
    pub default_length: LengthPreset,

    /// Ratio used by the plain-ratio entry points when none is given
    #[serde(default = "default_summary_ratio")]
    pub default_ratio: f64,

    /// Ratio for the short preset
    #[serde(default = "default_short_ratio")]
    pub short_ratio: f64,

    /// Ratio for the medium preset
    #[serde(default = "default_medium_ratio")]
    pub medium_ratio: f64,

    /// Ratio for the long preset
    #[serde(default = "default_long_ratio")]
    pub long_ratio: f64,

    /// Language of the stopword list (ISO code)
    #[serde(default = "default_language")]
    pub stopword_language: String,

    /// Number of key points when the caller gives none
    #[serde(default = "default_key_points")]
    pub default_key_points: usize,
}

impl SummaryConfig {
    /// Ratio for a length preset
    pub fn ratio_for(&self, preset: LengthPreset) -> f64 {
        match preset {
            LengthPreset::Short => self.short_ratio,
            LengthPreset::Medium => self.medium_ratio,
            LengthPreset::Long => self.long_ratio,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            default_length: LengthPreset::default(),
            default_ratio: default_summary_ratio(),
            short_ratio: default_short_ratio(),
            medium_ratio: default_medium_ratio(),
            long_ratio: default_long_ratio(),
            stopword_language: default_language(),
            default_key_points: default_key_points(),
        }
    }
}

/// Transcript retrieval settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptConfig {
    /// Language requested when the caller names none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Languages advertised by the tool server
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,

    /// Use any available track when the requested language is missing
    #[serde(default = "default_true")]
    pub fallback_to_any_language: bool,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with page requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            supported_languages: default_supported_languages(),
            fallback_to_any_language: true,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Transcript cache settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Whether fetched transcripts are cached in memory
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Time-to-live of a cached transcript in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Rate limiting of tool calls
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Whether tool calls are rate limited
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests allowed per window
    #[serde(default = "default_rate_limit_requests")]
    pub requests: u32,

    /// Window length in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests: default_rate_limit_requests(),
            window_secs: default_rate_limit_window_secs(),
        }
    }
}

/// Tool server identity reported during the handshake
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server name
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Server version
    #[serde(default = "default_server_version")]
    pub version: String,

    /// Bind address for the SSE transport
    #[serde(default = "default_sse_host")]
    pub sse_host: String,

    /// Port for the SSE transport
    #[serde(default = "default_sse_port")]
    pub sse_port: u16,

    /// Path of the SSE event stream
    #[serde(default = "default_sse_path")]
    pub sse_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            version: default_server_version(),
            sse_host: default_sse_host(),
            sse_port: default_sse_port(),
            sse_path: default_sse_path(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" | "critical" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_summary_ratio() -> f64 {
    0.3
}

fn default_short_ratio() -> f64 {
    0.2
}

fn default_medium_ratio() -> f64 {
    0.35
}

fn default_long_ratio() -> f64 {
    0.5
}

fn default_key_points() -> usize {
    5
}

fn default_language() -> String {
    "en".to_string()
}

fn default_supported_languages() -> Vec<String> {
    ["en", "ko", "es", "fr", "de", "ja", "zh"]
        .iter()
        .map(|l| l.to_string())
        .collect()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    86_400 // 24 hours
}

fn default_rate_limit_requests() -> u32 {
    100
}

fn default_rate_limit_window_secs() -> u64 {
    3600
}

fn default_server_name() -> String {
    "YouTube Summary MCP".to_string()
}

fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_sse_host() -> String {
    "0.0.0.0".to_string()
}

fn default_sse_port() -> u16 {
    10719
}

fn default_sse_path() -> String {
    "/sse".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load the configuration from a JSON file, writing defaults if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply `YTSUMM_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("YTSUMM_LOG_LEVEL") {
            self.log_level = level.parse()?;
        }

        if let Some(length) = lookup("YTSUMM_SUMMARY_LENGTH") {
            self.summary.default_length = length
                .parse()
                .map_err(|e: SummaryError| anyhow!("YTSUMM_SUMMARY_LENGTH: {}", e))?;
        }

        if let Some(language) = lookup("YTSUMM_DEFAULT_LANGUAGE") {
            self.transcript.default_language = language.trim().to_lowercase();
        }

        if let Some(host) = lookup("YTSUMM_SSE_HOST") {
            self.server.sse_host = host.trim().to_string();
        }

        if let Some(port) = lookup("YTSUMM_SSE_PORT") {
            self.server.sse_port = port
                .trim()
                .parse()
                .map_err(|e| anyhow!("YTSUMM_SSE_PORT: invalid port '{}': {}", port, e))?;
        }

        if let Some(path) = lookup("YTSUMM_SSE_PATH") {
            self.server.sse_path = path.trim().to_string();
        }

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("default_ratio", self.summary.default_ratio),
            ("short_ratio", self.summary.short_ratio),
            ("medium_ratio", self.summary.medium_ratio),
            ("long_ratio", self.summary.long_ratio),
        ];
        for (name, ratio) in ratios {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(anyhow!("summary.{} must be between 0.0 and 1.0, got {}", name, ratio));
            }
        }

        if self.summary.default_key_points == 0 {
            return Err(anyhow!("summary.default_key_points must be at least 1"));
        }

        // Validate languages
        crate::language_utils::validate_language_code(&self.transcript.default_language)
            .context("Invalid transcript.default_language")?;
        for language in &self.transcript.supported_languages {
            crate::language_utils::validate_language_code(language)
                .context("Invalid entry in transcript.supported_languages")?;
        }

        if self.rate_limit.enabled && (self.rate_limit.requests == 0 || self.rate_limit.window_secs == 0) {
            return Err(anyhow!("rate_limit.requests and rate_limit.window_secs must be positive when enabled"));
        }

        if self.transcript.timeout_secs == 0 {
            return Err(anyhow!("transcript.timeout_secs must be positive"));
        }

        let sse_path = &self.server.sse_path;
        if !sse_path.starts_with('/') || sse_path.len() < 2 {
            return Err(anyhow!("server.sse_path must be an absolute path like /sse, got '{}'", sse_path));
        }
        if sse_path.trim_end_matches('/') == crate::server::sse::MESSAGES_PATH.trim_end_matches('/') {
            return Err(anyhow!("server.sse_path must differ from {}", crate::server::sse::MESSAGES_PATH));
        }

        Ok(())
    }
}
