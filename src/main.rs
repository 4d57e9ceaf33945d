// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod batch;
mod character_parser;
mod errors;
mod file_utils;
mod preprocessor;
mod scene_parser;
mod script_parser;
mod script_types;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert script files to structured JSON (default command)
    #[command(alias = "parse")]
    Parse(ParseArgs),

    /// Generate shell completions for scriptparse
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input script file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for JSON files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Disable character alias clustering
    #[arg(long)]
    no_aliases: bool,

    /// Emit compact (single-line) JSON
    #[arg(long)]
    compact: bool,

    /// Maximum number of documents parsed at once in directory mode
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// scriptparse - Bilingual Screenplay Structure Extractor
///
/// Converts free-text screenplay documents (Chinese, English, or mixed)
/// into structured JSON: scenes, characters, dialogue and action lines.
#[derive(Parser, Debug)]
#[command(name = "scriptparse")]
#[command(version = "1.0.0")]
#[command(about = "Screenplay-to-JSON conversion tool")]
#[command(long_about = "scriptparse converts free-text screenplay documents into structured JSON.

EXAMPLES:
    scriptparse episode1.txt                  # Convert using default config
    scriptparse -f episode1.txt               # Force overwrite existing output
    scriptparse --no-aliases episode1.txt     # Skip alias clustering
    scriptparse -o out/ episode1.txt          # Write JSON into out/
    scriptparse -j 8 /scripts/                # Convert a directory, 8 jobs at once
    scriptparse --log-level debug /scripts/   # Directory mode with debug logging
    scriptparse completions bash > sp.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input script file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for JSON files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Disable character alias clustering
    #[arg(long)]
    no_aliases: bool,

    /// Emit compact (single-line) JSON
    #[arg(long)]
    compact: bool,

    /// Maximum number of documents parsed at once in directory mode
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} [{}] {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // The level is updated after loading the config if needed.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "scriptparse", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Parse(args)) => run_parse(args).await,
        None => {
            // Default behavior: use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let parse_args = ParseArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                no_aliases: cli.no_aliases,
                compact: cli.compact,
                jobs: cli.jobs,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_parse(parse_args).await
        }
    }
}

async fn run_parse(options: ParseArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader::<_, Config>(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if options.no_aliases {
        config.parsing.detect_aliases = false;
    }
    if options.compact {
        config.parsing.pretty_output = false;
    }
    if let Some(jobs) = options.jobs {
        config.parsing.concurrent_jobs = jobs;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            options
                .input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf()
        });
        controller
            .run(options.input_path.clone(), output_dir, options.force_overwrite)
            .await
    } else if options.input_path.is_dir() {
        controller
            .run_folder(
                options.input_path.clone(),
                options.output_dir.clone(),
                options.force_overwrite,
            )
            .await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
