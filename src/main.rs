use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use enrollment_analytics::analysis::run_analysis;
use enrollment_analytics::api::{AppState, create_router};
use enrollment_analytics::config::{AnalysisConfig, ConfigLoader};
use enrollment_analytics::ingest::{Dataset, load_dataset};
use enrollment_analytics::report::export_report;

#[derive(Parser)]
#[command(name = "enrollment-analytics")]
#[command(about = "Admissions and enrollment analytics for stakeholder dashboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Applications CSV export
    #[arg(long)]
    applications: PathBuf,
    /// Enrollment CSV export
    #[arg(long)]
    enrollment: PathBuf,
    /// Directory holding analysis.yaml and score_equivalence.yaml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every analysis and write one CSV per table plus report.json
    Analyze {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, default_value = "out")]
        out: PathBuf,
    },
    /// Run the analysis once and serve the report over HTTP
    Serve {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

fn load_config(dir: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    match dir {
        Some(dir) => {
            let loader = ConfigLoader::load(dir)
                .with_context(|| format!("failed to load configuration from {}", dir.display()))?;
            Ok(loader.into_config())
        }
        None => Ok(ConfigLoader::builtin().into_config()),
    }
}

fn load_inputs(inputs: &Inputs) -> anyhow::Result<(Dataset, AnalysisConfig)> {
    let config = load_config(inputs.config.as_deref())?;
    let dataset = load_dataset(&inputs.applications, &inputs.enrollment, &config)
        .context("failed to load input data")?;
    Ok((dataset, config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { inputs, out } => {
            let (dataset, config) = load_inputs(&inputs)?;
            let report = run_analysis(&dataset, &config).context("analysis failed")?;
            let written = export_report(&report, &out)
                .with_context(|| format!("failed to export report to {}", out.display()))?;
            info!(
                files = written.len(),
                out = %out.display(),
                run_id = %report.run_id,
                "Report exported"
            );
        }
        Commands::Serve { inputs, addr } => {
            let (dataset, config) = load_inputs(&inputs)?;
            let state = AppState::build(dataset, config).context("analysis failed")?;
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            info!(addr = %addr, run_id = %state.report().run_id, "Serving analytics API");
            axum::serve(listener, create_router(state))
                .await
                .context("server error")?;
        }
    }

    Ok(())
}
