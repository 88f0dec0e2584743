//! kpimpact - KPI impact calculator for AI-augmented business process agents
//!
//! A CLI tool that models the Revenue and EBITDA impact of AI agents per
//! business process and KPI, bundles the results into saved agent
//! configurations and exports them as a business-case report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (invalid plan or inputs, bad session document, export failure)

mod cli;
mod config;
mod engine;
mod error;
mod models;
mod plan;
mod report;
mod session;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat, ProcessFilter};
use config::{Config, CONFIG_FILE};
use engine::{catalog, KpiInputs};
use models::ImpactType;
use plan::Plan;
use report::{ExportRequest, ExportTarget, RenderOptions};
use session::Session;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging starts so `general.verbose` can set the level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(args.quiet));

    info!("kpimpact v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    if let Err(e) = catalog::validate() {
        error!("KPI catalog is inconsistent: {}", e);
        eprintln!("\n❌ Internal error: {}", e);
        std::process::exit(1);
    }

    if let Some(filter) = args.list_kpis {
        handle_list_kpis(filter);
        return Ok(());
    }

    match run(args, config).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .kpimpact.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize currency, report format and the rendering service.");
    Ok(())
}

/// Initialize logging at the merged verbosity level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle --list-kpis: print the catalog with default assumptions.
fn handle_list_kpis(filter: ProcessFilter) {
    for process in filter.processes() {
        let scale = match process.rate_scale() {
            models::RateScale::Fraction => "rates as fractions",
            models::RateScale::Percent => "rates as whole percentages",
        };
        println!("\n📂 {} ({})", process, scale);

        for &kpi in catalog::list_kpis(process) {
            println!("   • {} [{}] - {}", kpi.name(), kpi.ident(), kpi.impact_type());
            for (name, value) in KpiInputs::defaults_for(kpi).fields() {
                println!("       {} = {}", name, value);
            }
        }
    }
}

/// Build the session, export the report and optionally save the session.
async fn run(args: Args, config: Config) -> Result<()> {
    // Step 1: Load or start the session
    let mut session = match args.session {
        Some(ref path) => {
            println!("📂 Loading session: {}", path.display());
            Session::load_file(path)
                .with_context(|| format!("Failed to load session from {}", path.display()))?
        }
        None => Session::new(),
    };

    // Step 2: Replay the plan
    if let Some(ref path) = args.plan {
        println!("🧮 Applying plan: {}", path.display());
        let plan = Plan::load(path)?;
        plan.apply(&mut session)?;
    }

    if session.is_empty() {
        warn!("No agents in session; the report will be empty");
    }
    print_agents(&session, &config.report.currency_symbol);

    // Step 3: Export the report
    let request = ExportRequest::from_session(&session);
    let target = export_target(&config);
    println!("\n📝 Generating report...");

    let response = report::export(&request, &target)
        .await
        .context("Report export failed")?;

    let output_path = if config.general.output.is_empty() {
        suggested_path(&response.filename)
    } else {
        PathBuf::from(&config.general.output)
    };

    std::fs::write(&output_path, &response.document)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Step 4: Save the session document
    if let Some(ref path) = args.save_session {
        session
            .save(path)
            .with_context(|| format!("Failed to save session to {}", path.display()))?;
        println!("💾 Session saved to: {}", path.display());
    }

    // Print summary
    let sym = &config.report.currency_symbol;
    println!("\n📊 Impact Summary:");
    println!("   Agents: {}", session.len());
    println!(
        "   Revenue: {}",
        engine::builder::format_currency(request.report.totals.revenue, sym, 0)
    );
    println!(
        "   EBITDA: {}",
        engine::builder::format_currency(request.report.totals.ebitda, sym, 0)
    );
    println!("\n✅ Report saved to: {}", output_path.display());

    Ok(())
}

fn print_agents(session: &Session, sym: &str) {
    for agent in session.agents() {
        println!("\n🤖 {} ({})", agent.name(), agent.process());
        for result in agent.results() {
            println!(
                "   {} - {} {}",
                result.kpi,
                engine::builder::format_currency(result.impact_amount, sym, 0),
                result.impact_type
            );
            for detail in &result.details {
                println!("       {}", detail.display(sym));
            }
        }
        for impact_type in ImpactType::ALL {
            let total = agent.total_for(impact_type);
            if total != 0.0 {
                println!(
                    "   Total {}: {}",
                    impact_type,
                    engine::builder::format_currency(total, sym, 0)
                );
            }
        }
    }
}

fn export_target(config: &Config) -> ExportTarget {
    if !config.export.render_url.is_empty() {
        return ExportTarget::Remote {
            url: config.export.render_url.clone(),
            timeout: Duration::from_secs(config.export.timeout_seconds),
        };
    }

    match config.output_format() {
        OutputFormat::Json => ExportTarget::Json,
        OutputFormat::Markdown => ExportTarget::Markdown(RenderOptions {
            currency_symbol: config.report.currency_symbol.clone(),
            decimals: config.report.decimals,
            include_assumptions: config.report.include_assumptions,
            generated_at: chrono::Utc::now(),
        }),
    }
}

/// Keep only the final component of a renderer-suggested filename.
fn suggested_path(filename: &str) -> PathBuf {
    Path::new(filename)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("impact-report"))
}

/// Where the configuration came from, logged once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    WorkingDir,
    BuiltIn,
    Unreadable(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::WorkingDir => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigSource::BuiltIn => debug!("No config file found, using defaults"),
            ConfigSource::Unreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::WorkingDir)),
        Ok(None) => Ok((Config::default(), ConfigSource::BuiltIn)),
        Err(e) => Ok((Config::default(), ConfigSource::Unreadable(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_path_strips_directories() {
        assert_eq!(suggested_path("report.md"), PathBuf::from("report.md"));
        assert_eq!(suggested_path("../../etc/report.md"), PathBuf::from("report.md"));
        assert_eq!(suggested_path(".."), PathBuf::from("impact-report"));
    }

    #[test]
    fn test_export_target_selection() {
        let mut config = Config::default();
        assert!(matches!(export_target(&config), ExportTarget::Markdown(_)));

        config.report.format = "json".to_string();
        assert!(matches!(export_target(&config), ExportTarget::Json));

        config.export.render_url = "http://localhost:8080/render".to_string();
        match export_target(&config) {
            ExportTarget::Remote { url, timeout } => {
                assert_eq!(url, "http://localhost:8080/render");
                assert_eq!(timeout, Duration::from_secs(60));
            }
            other => panic!("unexpected target {:?}", other),
        }
    }
}
