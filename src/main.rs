//! Ripple-Mirror main entry point
//!
//! This is the command-line interface for the Ripple-Mirror site mirroring crawler.

use anyhow::Context;
use clap::Parser;
use ripple_mirror::config::{load_config_with_hash, Config};
use ripple_mirror::output::print_summary;
use ripple_mirror::Mirror;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Mirror: a concurrent site mirroring crawler
///
/// Ripple-Mirror fetches a start page, follows same-site links up to a depth
/// limit, downloads scripts, stylesheets, images and fonts from any host, and
/// writes everything into a local directory tree.
#[derive(Parser, Debug)]
#[command(name = "ripple-mirror")]
#[command(version)]
#[command(about = "A concurrent site mirroring crawler", long_about = None)]
struct Cli {
    /// URL of the first page to mirror
    #[arg(short, long)]
    url: String,

    /// Link depth to follow from the start page [default: 2]
    #[arg(short, long)]
    depth: Option<u32>,

    /// Output directory for the mirror [default: mirror]
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Number of pages fetched concurrently [default: 4]
    #[arg(short, long)]
    workers: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Make resource downloads share the worker limit with pages
    #[arg(long)]
    limit_resources: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(expand_single_dash_flags(std::env::args()));

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let mirror = Mirror::new(config).context("Failed to build HTTP client")?;

    // First Ctrl+C stops the crawl; the summary of what was saved still prints
    let cancel = mirror.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            cancel.cancel();
        }
    });

    let summary = match mirror.start(&cli.url).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_summary(&summary);
    }
    println!(
        "Mirror complete: {}",
        mirror.config().output.directory.display()
    );

    Ok(())
}

/// Long flags also accepted with a single dash (`-url`, `-depth=3`)
const SINGLE_DASH_FLAGS: &[&str] = &["url", "depth", "out", "workers", "config"];

/// Rewrites `-url` style arguments into `--url` before clap sees them
///
/// Without this, clap reads `-url` as `-u rl`.
fn expand_single_dash_flags(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            let Some(rest) = arg.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split('=').next().unwrap_or(rest);
            if SINGLE_DASH_FLAGS.iter().any(|flag| *flag == name) {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_mirror=info,warn"),
            1 => EnvFilter::new("ripple_mirror=debug,info"),
            2 => EnvFilter::new("ripple_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if given, then applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(out) = &cli.out {
        config.output.directory = out.clone();
    }
    if cli.limit_resources {
        config.crawler.limit_resources = true;
    }

    Ok(config)
}
