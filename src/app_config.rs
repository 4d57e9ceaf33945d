use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and defaulting configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Parsing options
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Parsing configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParsingConfig {
    // @field: Whether alias clustering runs by default
    #[serde(default = "default_detect_aliases")]
    pub detect_aliases: bool,

    // @field: Max documents parsed at once in batch mode
    #[serde(default = "default_concurrent_jobs")]
    pub concurrent_jobs: usize,

    // @field: File extensions recognized as script files
    #[serde(default = "default_input_extensions")]
    pub input_extensions: Vec<String>,

    // @field: Pretty-print JSON output
    #[serde(default = "default_pretty_output")]
    pub pretty_output: bool,
}

fn default_detect_aliases() -> bool {
    true
}

fn default_concurrent_jobs() -> usize {
    4
}

fn default_input_extensions() -> Vec<String> {
    vec![
        "txt".to_string(),
        "text".to_string(),
        "fountain".to_string(),
        "md".to_string(),
    ]
}

fn default_pretty_output() -> bool {
    true
}

impl Default for ParsingConfig {
    fn default() -> Self {
        ParsingConfig {
            detect_aliases: default_detect_aliases(),
            concurrent_jobs: default_concurrent_jobs(),
            input_extensions: default_input_extensions(),
            pretty_output: default_pretty_output(),
        }
    }
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            parsing: ParsingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Default configuration filename
    pub fn default_config_filename() -> &'static str {
        "conf.json"
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.parsing.concurrent_jobs == 0 {
            return Err(anyhow!("concurrent_jobs must be at least 1"));
        }

        if self.parsing.input_extensions.is_empty() {
            return Err(anyhow!("input_extensions must not be empty"));
        }

        Ok(())
    }
}
