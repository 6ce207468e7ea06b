use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::genderizer::{Gender, TransformRules};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default gender code applied when none is given on the command line
    #[serde(default = "default_gender_code")]
    pub gender: String,

    /// Transform table overrides (style tags, pronoun rules, anchors,
    /// visibility constraints); omitted fields fall back to the built-ins
    #[serde(default)]
    pub transform: TransformRules,

    /// Batch processing config
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Configuration for batch processing of prompt template files
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    // @field: Extension of prompt template files
    #[serde(default = "default_template_extension")]
    pub template_extension: String,

    // @field: Max files processed concurrently
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    // @field: Optional path of the run log receiving per-file failures
    #[serde(default)]
    pub run_log: Option<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            template_extension: default_template_extension(),
            concurrent_files: default_concurrent_files(),
            run_log: None,
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

fn default_gender_code() -> String {
    "F".to_string()
}

fn default_template_extension() -> String {
    "txt".to_string()
}

fn default_concurrent_files() -> usize {
    4
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate the default gender code
        let _gender = Gender::from_code(&self.gender)?;

        // Style tags must not be empty for either presentation
        if self.transform.style_tags.masculine.trim().is_empty() {
            return Err(anyhow!("Style tag for the masculine presentation is empty"));
        }
        if self.transform.style_tags.feminine.trim().is_empty() {
            return Err(anyhow!("Style tag for the feminine presentation is empty"));
        }

        // Pronoun patterns must be non-empty words
        for (table, rules) in [
            ("masculine", &self.transform.pronoun_rules.masculine),
            ("feminine", &self.transform.pronoun_rules.feminine),
        ] {
            if let Some(rule) = rules.iter().find(|r| r.pattern.trim().is_empty()) {
                return Err(anyhow!(
                    "Empty pronoun pattern in the {} rule table (replacement: '{}')",
                    table,
                    rule.replacement
                ));
            }
        }

        if self.batch.concurrent_files == 0 {
            return Err(anyhow!("batch.concurrent_files must be at least 1"));
        }

        if self.batch.template_extension.trim().is_empty() {
            return Err(anyhow!("batch.template_extension must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            gender: default_gender_code(),
            transform: TransformRules::default(),
            batch: BatchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
