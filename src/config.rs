//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.exocensus.toml` files.

use crate::cli::OutputFormat;
use crate::dataset::DEFAULT_DATASET_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".exocensus.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset source settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where the catalog comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Catalog URL. Empty disables the download.
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Report generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Report file path. Empty means stdout.
    #[serde(default)]
    pub output: String,
}

impl ReportConfig {
    /// The report file, if one is configured.
    pub fn output_path(&self) -> Option<PathBuf> {
        if self.output.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.output))
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.exocensus.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.url {
            self.dataset.url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.dataset.timeout_seconds = timeout;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check settings that the file format alone cannot rule out.
    ///
    /// Run after [`Config::merge_with_args`] so flags and file values are
    /// checked the same way.
    pub fn validate(&self) -> Result<(), String> {
        if self.dataset.timeout_seconds == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dataset.url, DEFAULT_DATASET_URL);
        assert_eq!(config.dataset.timeout_seconds, 30);
        assert_eq!(config.report.format, OutputFormat::Text);
        assert!(config.report.output_path().is_none());
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[dataset]
url = "https://example.org/exoplanets.json"

[report]
format = "markdown"
output = "census.md"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.dataset.url, "https://example.org/exoplanets.json");
        assert_eq!(config.dataset.timeout_seconds, 30);
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.output_path(), Some(PathBuf::from("census.md")));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[dataset]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.dataset.url, DEFAULT_DATASET_URL);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "[dataset]\ntimeout_seconds = 5").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.dataset.timeout_seconds, 5);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[dataset\nurl = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let args = Args::parse_from([
            "exocensus",
            "--url",
            "http://localhost:3000/api/v1/exoplanets",
            "--format",
            "json",
            "--timeout",
            "10",
            "--verbose",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.dataset.url, "http://localhost:3000/api/v1/exoplanets");
        assert_eq!(config.dataset.timeout_seconds, 10);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(config.report.output_path().is_none());
        assert!(config.general.verbose);
    }

    #[test]
    fn test_validate_rejects_zero_timeout_from_file() {
        let mut config: Config = toml::from_str("[dataset]\ntimeout_seconds = 0").unwrap();
        config.merge_with_args(&Args::parse_from(["exocensus"]));

        let err = config.validate().unwrap_err();
        assert!(err.contains("Timeout"));

        config.merge_with_args(&Args::parse_from(["exocensus", "--timeout", "5"]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_file_values_without_flags() {
        let mut config: Config = toml::from_str("[report]\nformat = \"json\"").unwrap();
        let args = Args::parse_from(["exocensus"]);

        config.merge_with_args(&args);

        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.dataset.timeout_seconds, 30);
    }
}
