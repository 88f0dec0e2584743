//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::BusinessProcess;
use clap::Parser;
use std::path::PathBuf;

/// kpimpact - KPI impact calculator for AI-augmented agents
///
/// Model the Revenue and EBITDA impact of AI agents across business
/// processes, save agent configurations and export a business-case report.
///
/// Examples:
///   kpimpact --plan agents.toml
///   kpimpact --plan agents.toml --format json -o report.json
///   kpimpact --session acme.json --render-url http://localhost:8080/render
///   kpimpact --list-kpis service
///   kpimpact --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Plan file (TOML) describing the agents to model
    #[arg(short, long, value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Session document (JSON) to load before applying the plan
    #[arg(short, long, value_name = "FILE")]
    pub session: Option<PathBuf>,

    /// Write the resulting session document to this file
    #[arg(long, value_name = "FILE")]
    pub save_session: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the filename suggested by the renderer.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Rendering service URL; the report is posted there instead of
    /// being rendered locally
    #[arg(long, value_name = "URL", env = "KPIMPACT_RENDER_URL")]
    pub render_url: Option<String>,

    /// Rendering service timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .kpimpact.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the KPIs of a process (all processes when none is given) and exit
    #[arg(long, value_name = "PROCESS", num_args = 0..=1, default_missing_value = "all")]
    pub list_kpis: Option<ProcessFilter>,

    /// Currency symbol used in the report
    #[arg(long, value_name = "SYMBOL")]
    pub currency: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .kpimpact.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(OutputFormat::Markdown),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Process selector for --list-kpis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProcessFilter {
    All,
    Sales,
    Service,
    Marketing,
    Finance,
    SupplyChain,
    It,
    Legal,
}

impl ProcessFilter {
    /// The processes selected, in catalog order.
    pub fn processes(self) -> Vec<BusinessProcess> {
        match self {
            ProcessFilter::All => BusinessProcess::ALL.to_vec(),
            ProcessFilter::Sales => vec![BusinessProcess::Sales],
            ProcessFilter::Service => vec![BusinessProcess::Service],
            ProcessFilter::Marketing => vec![BusinessProcess::Marketing],
            ProcessFilter::Finance => vec![BusinessProcess::Finance],
            ProcessFilter::SupplyChain => vec![BusinessProcess::SupplyChain],
            ProcessFilter::It => vec![BusinessProcess::It],
            ProcessFilter::Legal => vec![BusinessProcess::Legal],
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for the standalone modes
        if self.init_config || self.list_kpis.is_some() {
            return Ok(());
        }

        if self.plan.is_none() && self.session.is_none() {
            return Err("Nothing to do: pass --plan and/or --session".to_string());
        }

        if let Some(ref url) = self.render_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Render URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref currency) = self.currency {
            if currency.trim().is_empty() {
                return Err("Currency symbol cannot be empty".to_string());
            }
        }

        for (flag, path) in [("--plan", &self.plan), ("--session", &self.session)] {
            if let Some(path) = path {
                if !path.is_file() {
                    return Err(format!("{} file does not exist: {}", flag, path.display()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_args(plan: &NamedTempFile) -> Args {
        Args {
            plan: Some(plan.path().to_path_buf()),
            session: None,
            save_session: None,
            output: None,
            format: None,
            render_url: None,
            timeout: None,
            config: None,
            list_kpis: None,
            currency: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    fn plan_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "agents = []").unwrap();
        file
    }

    #[test]
    fn test_validation_ok() {
        let plan = plan_file();
        assert!(make_args(&plan).validate().is_ok());
    }

    #[test]
    fn test_validation_requires_input() {
        let plan = plan_file();
        let mut args = make_args(&plan);
        args.plan = None;
        assert!(args.validate().is_err());

        args.list_kpis = Some(ProcessFilter::All);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_plan_file() {
        let plan = plan_file();
        let mut args = make_args(&plan);
        args.plan = Some(PathBuf::from("/nonexistent/plan.toml"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_url() {
        let plan = plan_file();
        let mut args = make_args(&plan);
        args.render_url = Some("localhost:8080".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let plan = plan_file();
        let mut args = make_args(&plan);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_list_kpis() {
        let args = Args::try_parse_from(["kpimpact", "--list-kpis"]).unwrap();
        assert_eq!(args.list_kpis, Some(ProcessFilter::All));

        let args = Args::try_parse_from(["kpimpact", "--list-kpis", "supply-chain"]).unwrap();
        assert_eq!(
            args.list_kpis.unwrap().processes(),
            vec![BusinessProcess::SupplyChain]
        );
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_name("pdf"), None);
    }
}
