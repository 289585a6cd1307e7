// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (to stderr, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Crawl the site, stopping early on Ctrl-C
// 4. Print every page with its links to stdout, and a summary to stderr
// 5. Exit with proper code (0 = crawl finished, 2 = error)
//
// Failed pages are part of a normal run; only a bad root URL or an internal
// fault makes us exit non-zero.
// =============================================================================

mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use site_walker::{CrawlResult, PageOutcome, Walker, WalkerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() {
    // stdout is reserved for results, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_walker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = WalkerConfig::default().with_parallelism(cli.parallelism);

    // Ctrl-C stops new fetches; we still print what we have
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, finishing in-flight pages");
                cancel.cancel();
            }
        });
    }

    let walker = Walker::http(config)
        .context("Failed to set up the crawler")?
        .with_cancellation(cancel);

    let results = walker
        .crawl(&cli.root_url)
        .await
        .with_context(|| format!("Failed to crawl {}", cli.root_url))?;

    write_results(&mut io::stdout().lock(), &results).context("Failed to write results")?;
    write_summary(&mut io::stderr().lock(), &results).context("Failed to write summary")?;

    Ok(())
}

// One line per page, then one tab-indented line per link
fn write_results(out: &mut impl Write, results: &CrawlResult) -> io::Result<()> {
    for (page, outcome) in results.iter() {
        match outcome {
            PageOutcome::Failed => writeln!(out, "{}: Failed to load", page)?,
            PageOutcome::Fetched(links) => {
                writeln!(out, "{}: {} links", page, links.len())?;
                for link in links {
                    writeln!(out, "\t{}", link)?;
                }
            }
        }
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, results: &CrawlResult) -> io::Result<()> {
    writeln!(
        out,
        "Crawled {} pages and found {} links and had {} failed page loads.",
        results.pages(),
        results.links_found(),
        results.pages_failed()
    )
}
