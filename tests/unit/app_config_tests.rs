/*!
 * Tests for application configuration
 */

use scriptparse::app_config::{Config, LogLevel, ParsingConfig};

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert!(config.parsing.detect_aliases);
    assert_eq!(config.parsing.concurrent_jobs, 4);
    assert_eq!(
        config.parsing.input_extensions,
        vec!["txt", "text", "fountain", "md"]
    );
    assert!(config.parsing.pretty_output);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(Config::default_config_filename(), "conf.json");
}

/// Test validation passes for the defaults
#[test]
fn test_validate_withDefaultConfig_shouldSucceed() {
    assert!(Config::default().validate().is_ok());
}

/// Test validation rejects a zero concurrency bound
#[test]
fn test_validate_withZeroConcurrentJobs_shouldFail() {
    let mut config = Config::default();
    config.parsing.concurrent_jobs = 0;

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("concurrent_jobs"));
}

/// Test validation rejects an empty extension list
#[test]
fn test_validate_withNoExtensions_shouldFail() {
    let mut config = Config::default();
    config.parsing.input_extensions.clear();

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("input_extensions"));
}

/// Test partial JSON filling in the remaining defaults
#[test]
fn test_deserialize_withPartialJson_shouldApplyDefaults() {
    let json = r#"{"parsing": {"concurrent_jobs": 8}, "log_level": "debug"}"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.parsing.concurrent_jobs, 8);
    assert!(config.parsing.detect_aliases);
    assert!(config.parsing.pretty_output);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test an empty JSON object yielding the full default config
#[test]
fn test_deserialize_withEmptyJson_shouldMatchDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();

    assert_eq!(config.parsing, ParsingConfig::default());
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test config serialization round-trips the log level tag
#[test]
fn test_serialize_withCustomLevel_shouldUseLowercaseTag() {
    let mut config = Config::default();
    config.log_level = LogLevel::Trace;

    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(value["log_level"], "trace");
}

/// Test log level mapping to the log crate filters
#[test]
fn test_to_level_filter_withAllLevels_shouldMapDirectly() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
