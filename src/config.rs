//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.kpimpact.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".kpimpact.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Rendering service settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output path. Empty means the renderer's suggested filename.
    #[serde(default)]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Report presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimals shown on impact amounts.
    #[serde(default)]
    pub decimals: usize,

    /// List each saved KPI's input assumptions.
    #[serde(default = "default_true")]
    pub include_assumptions: bool,

    /// Output format: "markdown" or "json".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            decimals: 0,
            include_assumptions: true,
            format: default_format(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "markdown".to_string()
}

/// Remote rendering service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Rendering service endpoint. Empty renders locally.
    #[serde(default)]
    pub render_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            render_url: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    fn validate(&self) -> Result<()> {
        if OutputFormat::from_name(&self.report.format).is_none() {
            bail!(
                "unknown report format '{}' (expected markdown or json)",
                self.report.format
            );
        }
        if self.report.decimals > 6 {
            bail!("report decimals must be between 0 and 6");
        }
        if self.export.timeout_seconds == 0 {
            bail!("export timeout must be at least 1 second");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(format) = args.format {
            self.report.format = match format {
                OutputFormat::Markdown => "markdown",
                OutputFormat::Json => "json",
            }
            .to_string();
        }

        if let Some(ref currency) = args.currency {
            self.report.currency_symbol = currency.clone();
        }

        if let Some(ref url) = args.render_url {
            self.export.render_url = url.clone();
        }

        if let Some(timeout) = args.timeout {
            self.export.timeout_seconds = timeout;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level after merging: `--quiet` wins, then `--verbose` or
    /// `general.verbose`.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The configured output format, Markdown when unrecognised.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_name(&self.report.format).unwrap_or_default()
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
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.currency_symbol, "$");
        assert_eq!(config.report.decimals, 0);
        assert!(config.report.include_assumptions);
        assert_eq!(config.output_format(), OutputFormat::Markdown);
        assert!(config.export.render_url.is_empty());
        assert_eq!(config.export.timeout_seconds, 60);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "acme.md"
verbose = true

[report]
currency_symbol = "€"
decimals = 2
format = "json"

[export]
render_url = "http://localhost:8080/render"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "acme.md");
        assert!(config.general.verbose);
        assert_eq!(config.report.currency_symbol, "€");
        assert_eq!(config.report.decimals, 2);
        assert!(config.report.include_assumptions);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.export.render_url, "http://localhost:8080/render");
        assert_eq!(config.export.timeout_seconds, 60);
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[report]\nformat = \"pdf\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let args = Args::try_parse_from([
            "kpimpact",
            "--format",
            "json",
            "--currency",
            "£",
            "--timeout",
            "5",
            "-o",
            "out.json",
        ])
        .unwrap();

        config.merge_with_args(&args);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.report.currency_symbol, "£");
        assert_eq!(config.export.timeout_seconds, 5);
        assert_eq!(config.general.output, "out.json");
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_merge_keeps_file_values_without_flags() {
        let mut config = Config::default();
        config.report.currency_symbol = "€".to_string();
        let args = Args::try_parse_from(["kpimpact"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.report.currency_symbol, "€");
    }

    #[test]
    fn test_log_level() {
        let mut config = Config::default();
        let args = Args::try_parse_from(["kpimpact"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.log_level(args.quiet), tracing::Level::INFO);

        let args = Args::try_parse_from(["kpimpact", "--verbose"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.log_level(args.quiet), tracing::Level::DEBUG);
    }

    #[test]
    fn test_verbose_from_file_sets_debug_level() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[general]\nverbose = true").unwrap();
        let mut config = Config::load(file.path()).unwrap();

        let args = Args::try_parse_from(["kpimpact"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.log_level(args.quiet), tracing::Level::DEBUG);

        let args = Args::try_parse_from(["kpimpact", "--quiet"]).unwrap();
        config.merge_with_args(&args);
        assert_eq!(config.log_level(args.quiet), tracing::Level::ERROR);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[export]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.export.timeout_seconds, 60);
    }
}
