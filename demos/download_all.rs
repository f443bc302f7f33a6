//! Downloads every comic image in a range
//!
//! ```text
//! cargo run --example download_all -- --from 1 --to 10 --dir comics
//! ```

use anyhow::Context;
use clap::Parser;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xkcd_ripple::config::{load_config, ClientConfig};
use xkcd_ripple::XkcdClient;

/// Download xkcd comic images
#[derive(Parser, Debug)]
#[command(name = "download_all")]
#[command(about = "Download xkcd comic images", long_about = None)]
struct Cli {
    /// First comic number
    #[arg(long, default_value_t = 1)]
    from: u32,

    /// Last comic number (defaults to the latest)
    #[arg(long)]
    to: Option<u32>,

    /// Output directory (defaults to the configured download directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let directory = cli
        .dir
        .clone()
        .unwrap_or_else(|| config.download.directory.clone());
    let client = XkcdClient::with_config(config)?;

    let mut comics = client.stream_comics(cli.from, cli.to).await?;
    let mut downloaded = 0usize;
    let mut failed = 0usize;

    while let Some(comic) = comics.next().await {
        let comic = match comic {
            Ok(comic) => comic,
            Err(e) => {
                // Some numbers (famously 404) do not exist upstream
                tracing::warn!("Skipping comic: {}", e);
                failed += 1;
                continue;
            }
        };

        let path = directory.join(file_name(comic.number, &comic.image.filename));
        tracing::info!("Downloading {} - {}", comic.number, comic.title);
        match client.download_image(&comic.image, Some(&path)).await {
            Ok(path) => {
                downloaded += 1;
                tracing::debug!("Saved {}", path.display());
            }
            Err(e) => {
                tracing::warn!("Failed to download comic {}: {}", comic.number, e);
                failed += 1;
            }
        }
    }

    tracing::info!("Done: {} downloaded, {} failed", downloaded, failed);
    Ok(())
}

/// `xkcd-{number}.{ext}`, keeping the upstream image extension
fn file_name(number: u32, upstream: &str) -> String {
    let extension = Path::new(upstream)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png");
    format!("xkcd-{}.{}", number, extension)
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xkcd_ripple=info,download_all=info,warn")),
            1 => EnvFilter::new("xkcd_ripple=debug,download_all=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
