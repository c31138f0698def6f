use crate::github::API_BASE_URL;
use crate::rate_limit::RATE_LIMIT_RESET_THRESHOLD;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "list-stars")]
#[command(about = "Export list of Stars of REPOSITORY (eg. `account/repo')")]
#[command(version)]
pub struct Cli {
    /// Repository in `account/name` form
    pub repository: String,

    /// Output file (defaults to stdout, `-` also means stdout)
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Wait for the rate limit reset when fewer calls than this remain
    #[arg(long, default_value_t = RATE_LIMIT_RESET_THRESHOLD)]
    pub rate_limit_threshold: u32,
}

impl Cli {
    /// The output path, or `None` for stdout.
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output.as_ref().filter(|path| path.as_os_str() != "-")
    }
}
