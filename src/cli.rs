// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Scores the security posture of a website from its public signals.
#[derive(Debug, Parser)]
#[command(name = "vanguard-score", version, about)]
pub struct Cli {
    /// URL to score, e.g. https://example.com. Without it the interactive UI starts.
    pub url: Option<String>,

    /// Print the report as JSON instead of a text summary.
    #[arg(long)]
    pub json: bool,

    /// Path to a TOML configuration file.
    #[arg(long, env = "VANGUARD_SCORE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Prefixes `https://` when the user typed a bare host name.
pub fn with_default_scheme(input: &str) -> String {
    let input = input.trim();
    if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}
