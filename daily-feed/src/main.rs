use anyhow::Context;
use clap::Parser;
use daily_feed::{run_all, DigestConfig, FeedParser, Fetcher, LenientDateParser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Publish the last day's new entries of each configured feed.
#[derive(Debug, Parser)]
#[command(name = "daily-feed", version)]
struct Cli {
    /// TOML or JSON file listing the feeds; the built-in set is used otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that relative output and seen-state paths are resolved against.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<DigestConfig> {
    let mut config = match &cli.config {
        Some(path) => DigestConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DigestConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output dir {}", dir.display()))?;
        config = config.with_base_dir(dir);
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    let fetcher = match Fetcher::new(&config.fetch) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    info!("Starting daily feed run for {} feeds", config.feeds.len());
    let summary = run_all(&config, &fetcher, &FeedParser::new(), &LenientDateParser).await;
    summary.exit_code()
}
