mod cli;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mirror_core::{extract_sitemap_urls, select_jobs, RunSummary};
use mirror_engine::{load_sitemap, ChromiumRenderer, Mirror, ReqwestFetcher, SitemapSource};
use mirror_logging::{mirror_error, mirror_info, mirror_warn};

use crate::cli::Cli;
use crate::config::MirrorConfig;

/// Exit status when the run finished but at least one page failed.
const EXIT_PAGE_FAILURES: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    mirror_logging::initialize(cli.log_destination(), cli.log_level());

    match run(cli).await {
        Ok(summary) if summary.all_saved() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_PAGE_FAILURES),
        Err(err) => {
            mirror_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let mut config = match &cli.config {
        Some(path) => MirrorConfig::load(path)?,
        None => MirrorConfig::default(),
    };
    config.apply(cli.overrides())?;

    let fetcher = Arc::new(
        ReqwestFetcher::new(config.fetch_settings()).context("failed to build HTTP client")?,
    );

    let source = SitemapSource::from_arg(&cli.sitemap);
    let sitemap = load_sitemap(&source, fetcher.as_ref())
        .await
        .with_context(|| format!("failed to load sitemap {source}"))?;

    let urls = extract_sitemap_urls(&sitemap);
    mirror_info!("Found {} URLs to crawl", urls.len());
    let jobs = select_jobs(urls, config.page_limit);
    if jobs.is_empty() {
        mirror_warn!("Nothing to crawl in {}", source);
    }

    let mirror = Mirror::new(
        Arc::new(ChromiumRenderer::new(config.renderer_settings())),
        fetcher,
        config.pipeline_settings(),
    );
    let summary = mirror.run(&jobs).await;

    mirror_info!(
        "Finished: {} of {} pages saved, {} asset failures",
        summary.saved(),
        summary.outcomes().len(),
        summary.asset_failures()
    );
    for url in summary.failed_urls() {
        mirror_warn!("Not saved: {}", url);
    }

    Ok(summary)
}
