use std::process;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blogharvest::cli::Cli;
use blogharvest::error::HarvestError;
use blogharvest::export;
use blogharvest::resilience::RetryPolicy;
use blogharvest::scrape::client::HttpFetcher;
use blogharvest::scrape::{ScrapeOptions, Scraper};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // BLOGHARVEST_LOG overrides; otherwise -v steps up the level.
    let log_level = std::env::var("BLOGHARVEST_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
        .to_string()
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<HarvestError>() {
            Some(HarvestError::Configuration(_)) => 2,
            Some(HarvestError::Io(_)) | Some(HarvestError::Csv(_)) => 3,
            Some(HarvestError::Parse(_)) => 4,
            Some(HarvestError::Cancelled) => 130,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted, finishing up...");
            signal_token.cancel();
        }
    });

    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout_secs))?;
    let options = ScrapeOptions {
        base_url: cli.base_url.clone(),
        directory_no: cli.directory_no,
        active_directory_seq: cli.active_directory_seq,
        pages: cli.pages,
        retry: RetryPolicy::fixed(
            cli.max_attempts,
            Duration::from_secs(cli.retry_delay_secs),
        ),
    };

    info!(
        "Crawling directory {} ({} page(s)) from {}",
        options.directory_no, options.pages, options.base_url
    );
    let scraper = Scraper::new(fetcher, options);
    let records = scraper.run(&token).await?;

    export::write_csv(&cli.output, &records)?;
    println!("Wrote {} posts to {}", records.len(), cli.output.display());
    Ok(())
}
