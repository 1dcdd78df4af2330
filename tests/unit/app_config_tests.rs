/*!
 * Tests for application configuration functionality
 */

use std::collections::HashMap;

use anyhow::Result;
use ytsumm::app_config::{Config, LengthPreset, LogLevel};
use ytsumm::errors::SummaryError;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.summary.default_length, LengthPreset::Medium);
    assert_eq!(config.summary.short_ratio, 0.2);
    assert_eq!(config.summary.medium_ratio, 0.35);
    assert_eq!(config.summary.long_ratio, 0.5);
    assert_eq!(config.summary.default_ratio, 0.3);
    assert_eq!(config.summary.default_key_points, 5);
    assert_eq!(config.summary.stopword_language, "en");

    assert_eq!(config.transcript.default_language, "en");
    assert!(config.transcript.fallback_to_any_language);
    assert!(config.transcript.supported_languages.contains(&"ko".to_string()));

    assert!(config.cache.enabled);
    assert_eq!(config.cache.ttl_secs, 86_400);
    assert!(config.rate_limit.enabled);
    assert_eq!(config.rate_limit.requests, 100);
    assert_eq!(config.rate_limit.window_secs, 3600);

    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_ratio_for_shouldUseSingleTable() {
    let config = Config::default();

    assert_eq!(config.summary.ratio_for(LengthPreset::Short), 0.2);
    assert_eq!(config.summary.ratio_for(LengthPreset::Medium), 0.35);
    assert_eq!(config.summary.ratio_for(LengthPreset::Long), 0.5);
}

#[test]
fn test_length_preset_parse_shouldAcceptNamesCaseInsensitively() {
    assert_eq!(" Short ".parse::<LengthPreset>().unwrap(), LengthPreset::Short);
    assert_eq!("LONG".parse::<LengthPreset>().unwrap(), LengthPreset::Long);
    assert!(matches!(
        "brief".parse::<LengthPreset>(),
        Err(SummaryError::InvalidLength(name)) if name == "brief"
    ));
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.summary.long_ratio = 1.5;
    assert!(config.validate().is_err());
    config.summary.long_ratio = 0.5;

    config.summary.default_key_points = 0;
    assert!(config.validate().is_err());
    config.summary.default_key_points = 5;

    config.transcript.default_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.transcript.default_language = "en-US".to_string();
    assert!(config.validate().is_ok());

    config.rate_limit.requests = 0;
    assert!(config.validate().is_err());
    config.rate_limit.enabled = false;
    assert!(config.validate().is_ok());

    config.transcript.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.summary.medium_ratio, 0.35);

    // The written file loads back to the same settings
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.summary.default_length, config.summary.default_length);
    assert_eq!(reloaded.transcript.supported_languages, config.transcript.supported_languages);
    Ok(())
}

#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "summary": { "default_length": "long" }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;
    assert_eq!(config.summary.default_length, LengthPreset::Long);
    assert_eq!(config.summary.short_ratio, 0.2);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.transcript.default_language, "en");
    Ok(())
}

#[test]
fn test_load_or_create_withMalformedFile_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_apply_overrides_shouldReadPrefixedKeys() -> Result<()> {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("YTSUMM_LOG_LEVEL", "warning"),
        ("YTSUMM_SUMMARY_LENGTH", "short"),
        ("YTSUMM_DEFAULT_LANGUAGE", " KO "),
    ]);

    let mut config = Config::default();
    config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()))?;

    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.summary.default_length, LengthPreset::Short);
    assert_eq!(config.transcript.default_language, "ko");
    Ok(())
}

#[test]
fn test_apply_overrides_withBadValue_shouldFail() {
    let mut config = Config::default();
    let result = config.apply_overrides(|key| (key == "YTSUMM_SUMMARY_LENGTH").then(|| "tiny".to_string()));

    assert!(result.is_err());
}

#[test]
fn test_sse_settings_shouldDefaultAndOverride() -> Result<()> {
    let mut config = Config::default();
    assert_eq!(config.server.sse_host, "0.0.0.0");
    assert_eq!(config.server.sse_port, 10719);
    assert_eq!(config.server.sse_path, "/sse");

    let vars: HashMap<&str, &str> = HashMap::from([
        ("YTSUMM_SSE_HOST", "127.0.0.1"),
        ("YTSUMM_SSE_PORT", " 8080 "),
        ("YTSUMM_SSE_PATH", "/events"),
    ]);
    config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()))?;

    assert_eq!(config.server.sse_host, "127.0.0.1");
    assert_eq!(config.server.sse_port, 8080);
    assert_eq!(config.server.sse_path, "/events");
    config.validate()?;

    let result = config.apply_overrides(|key| (key == "YTSUMM_SSE_PORT").then(|| "99999".to_string()));
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_validate_withBadSsePath_shouldFail() {
    for path in ["sse", "/", "/messages/", "/messages"] {
        let mut config = Config::default();
        config.server.sse_path = path.to_string();
        assert!(config.validate().is_err(), "{} should be rejected", path);
    }
}

#[test]
fn test_log_level_parse_shouldAcceptAliases() {
    assert_eq!("critical".parse::<LogLevel>().unwrap(), LogLevel::Error);
    assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    assert!("loud".parse::<LogLevel>().is_err());
}
