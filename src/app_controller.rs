use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::batch::{BatchDocument, BatchParser};
use crate::file_utils::FileManager;
use crate::script_parser::{ParseOptions, ScriptParser};
use crate::script_types::ParsedScript;

// @module: Application controller for script conversion

/// Main application controller for script-to-JSON conversion
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared parser instance
    parser: ScriptParser,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parser: ScriptParser::new(),
        })
    }

    /// Build per-document parse options for an input file.
    ///
    /// The filename is recorded in the metadata and, when it carries an
    /// episode marker, the episode number is inferred from it.
    fn options_for(&self, input_file: &Path) -> ParseOptions {
        let filename = input_file
            .file_name()
            .map(|name| name.to_string_lossy().to_string());
        let episode_number = filename
            .as_deref()
            .and_then(FileManager::extract_episode_number);

        ParseOptions {
            detect_aliases: self.config.parsing.detect_aliases,
            filename,
            episode_number,
        }
    }

    /// Serialize a parsed script according to the output settings
    fn render_output(&self, parsed: &ParsedScript) -> Result<String> {
        let json = if self.config.parsing.pretty_output {
            serde_json::to_string_pretty(parsed)?
        } else {
            serde_json::to_string(parsed)?
        };
        Ok(json)
    }

    /// Convert a single script file, writing `<stem>.json` to the output
    /// directory
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        let output_path = FileManager::generate_output_path(&input_file, &output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        let start = Instant::now();
        let text = FileManager::read_to_string(&input_file)?;
        let options = self.options_for(&input_file);

        let parsed = self
            .parser
            .parse(&text, &options)
            .with_context(|| format!("Failed to parse script: {:?}", input_file))?;

        let json = self.render_output(&parsed)?;
        FileManager::write_to_file(&output_path, &json)?;

        info!(
            "Parsed {:?}: {} scene(s), {} character(s), language {} in {:?}",
            input_file,
            parsed.total_scenes,
            parsed.total_characters,
            parsed.language,
            start.elapsed()
        );

        Ok(())
    }

    /// Convert every script file under a directory, in parallel.
    ///
    /// Outputs are written into the given output directory, or next to
    /// their inputs when none is given. One file's failure is reported and
    /// never aborts the rest of the batch.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        let files =
            FileManager::find_script_files(&input_dir, &self.config.parsing.input_extensions)?;

        if files.is_empty() {
            warn!("No script files found in directory: {:?}", input_dir);
            return Ok(());
        }

        if let Some(dir) = &output_dir {
            FileManager::ensure_dir(dir)?;
        }

        let mut documents = Vec::new();
        let mut targets = Vec::new();

        for path in files {
            let target_dir = match &output_dir {
                Some(dir) => dir.as_path(),
                None => path.parent().unwrap_or(Path::new(".")),
            };
            let output_path = FileManager::generate_output_path(&path, target_dir);
            if output_path.exists() && !force_overwrite {
                debug!("Skipping {:?}, output already exists", path);
                continue;
            }

            let text = match FileManager::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to read {:?}: {}", path, e);
                    continue;
                }
            };

            documents.push(BatchDocument {
                id: path.to_string_lossy().to_string(),
                text,
                options: self.options_for(&path),
            });
            targets.push(output_path);
        }

        if documents.is_empty() {
            info!("Nothing to do, all outputs exist");
            return Ok(());
        }

        let progress = ProgressBar::new(documents.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let progress_handle = progress.clone();
        let batch = BatchParser::new(self.config.parsing.concurrent_jobs);
        let report = batch
            .parse_documents(documents, move |done, _total| {
                progress_handle.set_position(done as u64);
            })
            .await;

        progress.finish_and_clear();

        for (outcome, target) in report.outcomes.iter().zip(targets.iter()) {
            if let Some(script) = &outcome.script {
                let json = self.render_output(script)?;
                if let Err(e) = FileManager::write_to_file(target, &json) {
                    error!("Failed to write {:?}: {}", target, e);
                }
            } else if let Some(failure) = &outcome.error {
                error!(
                    "{}: {} ({})",
                    failure.document, failure.message, failure.code
                );
            }
        }

        info!(
            "Batch complete: {} succeeded, {} failed",
            report.succeeded, report.failed
        );

        Ok(())
    }
}
