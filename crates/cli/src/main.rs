use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use portfolio_health_core::models::risk::RiskAssessment;
use portfolio_health_core::PortfolioHealth;
use portfolio_health_web::AppState;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod output;
mod settings;

use settings::{AppConfig, LogSettings};

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Portfolio health reports from a holdings spreadsheet.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults to `portfolio-health.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the portfolio analysis of a holdings file.
    Analyze(AnalyzeArgs),
    /// Write the PDF health report for a holdings file.
    Report(ReportArgs),
    /// Run the web front end.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Excel workbook or CSV file with the holdings.
    file: PathBuf,

    /// Print JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ReportArgs {
    /// Excel workbook or CSV file with the holdings.
    file: PathBuf,

    /// Directory to write the PDF into (overrides `report.output_dir`).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind (overrides `server.host`).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides `server.port`).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = settings::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config.log)?;

    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config),
        Commands::Report(args) => handle_report(args, &config),
        Commands::Serve(args) => handle_serve(args, config).await,
    }
}

fn init_logging(log: &LogSettings) -> Result<()> {
    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("failed to install the tracing subscriber: {e}"))?;
    Ok(())
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn analyze_file(health: &PortfolioHealth, file: &Path) -> Result<portfolio_health_core::models::analytics::Analysis> {
    let table = health
        .load_path(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let analysis = health
        .analyze(&table)
        .with_context(|| format!("analysing {}", file.display()))?;
    Ok(analysis)
}

fn handle_analyze(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let health = PortfolioHealth::new(config.report.clone());
    let analysis = analyze_file(&health, &args.file)?;
    let risk = RiskAssessment::from_summary(&analysis.summary);

    if args.json {
        let body = serde_json::json!({
            "holdings": analysis.holdings,
            "summary": analysis.summary,
            "risk": risk,
            "report": analysis.report,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let symbol = config.report.currency_symbol.as_str();
    println!("Portfolio Summary\n{}", output::summary_table(&analysis, symbol));
    println!("\nTop Holdings\n{}", output::holdings_table(&analysis.summary.top_holdings, symbol));
    println!("\nPerformance Highlights\n{}", output::movers_table(&analysis, symbol));
    println!("\nRisk Assessment\n{}", output::risk_table(&risk));

    let report = &analysis.report;
    if report.blank_rows_skipped > 0 || report.coerced_cells > 0 {
        println!(
            "\nNote: {} blank row(s) skipped, {} unreadable number(s) treated as 0.",
            report.blank_rows_skipped, report.coerced_cells
        );
    }
    Ok(())
}

fn handle_report(args: ReportArgs, config: &AppConfig) -> Result<()> {
    let health = PortfolioHealth::new(config.report.clone());
    let analysis = analyze_file(&health, &args.file)?;
    let artifact = health.generate_report(&analysis).context("generating report")?;

    let dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.report.output_dir));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes).with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), "report written");
    println!("{}", path.display());
    Ok(())
}

async fn handle_serve(args: ServeArgs, config: AppConfig) -> Result<()> {
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let state = AppState::new(PortfolioHealth::new(config.report))
        .with_max_upload_bytes(config.server.max_upload_bytes);
    portfolio_health_web::run_server(addr, state).await
}
