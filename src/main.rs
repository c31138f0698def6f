use clap::Parser;
use colored::*;
use github_stars_export::cli::Cli;
use github_stars_export::error::{GitHubStarsError, Result};
use github_stars_export::exporter::StargazerExporter;
use github_stars_export::github::GitHubClient;
use github_stars_export::models::{ExportSummary, RepositoryRef};
use github_stars_export::rate_limit::CountdownWaiter;
use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn run(cli: Cli) -> Result<ExportSummary> {
    // Validate before touching the network or the output file
    let repository: RepositoryRef = cli.repository.parse()?;

    let token = cli
        .token
        .clone()
        .ok_or_else(|| GitHubStarsError::EnvError("GITHUB_TOKEN is not set".to_string()))?;

    let client = GitHubClient::with_base_url(token, &cli.api_url)?;
    let exporter = StargazerExporter::new(client, CountdownWaiter::new())
        .with_threshold(cli.rate_limit_threshold);

    let output: Box<dyn Write> = match cli.output_path() {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    exporter.export(&repository, output).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Logs go to stderr; stdout may carry the CSV
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(summary) => {
            info!(
                repository = %summary.repository,
                rows = summary.rows,
                waits = summary.waits,
                "Export finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) if e.is_input_error() => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}
