use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::genderizer::{Gender, Genderizer};

// @module: Application controller for prompt template processing

/// Outcome of processing a single template file
enum RunOutcome {
    /// Output written to the given path
    Written(PathBuf),

    /// Output already existed and overwrite was not forced
    Skipped(PathBuf),
}

/// Main application controller for prompt genderization
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Gender parsed from the configured code
    gender: Gender,

    // @field: Transform compiled from the configured tables
    genderizer: Genderizer,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let gender = Gender::from_code(&config.gender)?;
        let genderizer = Genderizer::with_rules(config.transform.clone());

        Ok(Self {
            config,
            gender,
            genderizer,
        })
    }

    /// The gender presentation this controller applies
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Transform a single prompt string with the configured tables
    pub fn genderize_text(&self, prompt: &str) -> String {
        self.genderizer.apply(prompt, self.gender)
    }

    /// Run the main workflow with an input template file and output directory
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        match self.process_file(&input_file, &output_dir, force_overwrite)? {
            RunOutcome::Written(path) => {
                info!(
                    "Wrote {} version to {:?} in {}",
                    self.gender.display_name(),
                    path,
                    Self::format_duration(start_time.elapsed())
                );
            }
            RunOutcome::Skipped(_) => {
                warn!("Skipping file, genderized output already exists (use -f to force overwrite)");
            }
        }

        Ok(())
    }

    /// Process an entire folder of prompt templates
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let extension = &self.config.batch.template_extension;
        let mut files = FileManager::find_files(&input_dir, extension)?;

        // Outputs of a previous run must not be fed back into the transform
        files.retain(|path| !FileManager::is_genderized_output(path));
        files.sort();

        if files.is_empty() {
            warn!("No prompt templates (*.{}) found in {:?}", extension, input_dir);
            return Ok(());
        }

        info!(
            "Genderizing {} prompt template(s) as {}",
            files.len(),
            self.gender.display_name()
        );

        let progress_bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let written = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        stream::iter(files)
            .map(|path| {
                let progress = progress_bar.clone();
                let written = &written;
                let skipped = &skipped;
                let failed = &failed;
                async move {
                    let output_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
                    match self.process_file(&path, &output_dir, force_overwrite) {
                        Ok(RunOutcome::Written(output)) => {
                            debug!("Wrote {:?}", output);
                            written.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(RunOutcome::Skipped(output)) => {
                            debug!("Skipped existing {:?}", output);
                            skipped.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            error!("Error processing {:?}: {}", path, e);
                            failed.fetch_add(1, Ordering::Relaxed);
                            self.log_failure(&path, &e);
                        }
                    }
                    progress.inc(1);
                }
            })
            .buffer_unordered(self.config.batch.concurrent_files)
            .collect::<Vec<()>>()
            .await;

        progress_bar.finish_and_clear();

        info!(
            "Finished: {} written, {} skipped, {} failed",
            written.load(Ordering::Relaxed),
            skipped.load(Ordering::Relaxed),
            failed.load(Ordering::Relaxed)
        );

        Ok(())
    }

    /// Read one template, transform it, and write the output next to it
    fn process_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<RunOutcome> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(output_dir)?;

        let output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.gender.to_lowercase_string(),
            &self.config.batch.template_extension,
        );

        if output_path.exists() && !force_overwrite {
            return Ok(RunOutcome::Skipped(output_path));
        }

        let template = FileManager::read_to_string(input_file)?;
        let transformed = self.genderizer.apply(&template, self.gender);
        FileManager::write_to_file(&output_path, &transformed)?;

        Ok(RunOutcome::Written(output_path))
    }

    /// Record a per-file failure in the configured run log, if any
    fn log_failure(&self, path: &Path, error: &anyhow::Error) {
        if let Some(run_log) = &self.config.batch.run_log {
            let entry = format!("{}: {}", path.display(), error);
            if let Err(log_error) = FileManager::append_to_log_file(run_log, &entry) {
                warn!("Could not write run log: {}", log_error);
            }
        }
    }

    /// Format a duration as seconds with millisecond precision
    fn format_duration(duration: std::time::Duration) -> String {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
