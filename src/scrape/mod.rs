//! Scraping pipeline: listing pages to post records.

pub mod client;
pub mod listing;
pub mod post;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{HarvestError, Result};
use crate::resilience::{with_retry_cancellable, RetryPolicy, TracingObserver};
use client::PageFetcher;
pub use post::PostRecord;

/// What to crawl and how hard to try.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub base_url: String,
    pub directory_no: u32,
    pub active_directory_seq: u32,
    /// Listing pages to walk, starting at 1.
    pub pages: u32,
    pub retry: RetryPolicy,
}

/// Walks the theme listing and scrapes each post.
pub struct Scraper<F: PageFetcher> {
    fetcher: F,
    options: ScrapeOptions,
}

impl<F: PageFetcher> Scraper<F> {
    pub fn new(fetcher: F, options: ScrapeOptions) -> Self {
        Self { fetcher, options }
    }

    /// Collect post links across the configured listing pages. A page with
    /// no links means the theme section ran out; pagination stops there.
    pub async fn collect_post_links(&self) -> Result<Vec<String>> {
        let mut links = Vec::new();
        for page in 1..=self.options.pages.max(1) {
            let url = listing::listing_url(
                &self.options.base_url,
                self.options.directory_no,
                self.options.active_directory_seq,
                page,
            )?;
            let html = self.fetcher.fetch(&url).await?;
            let found = listing::extract_post_links(&html, &self.options.base_url)?;
            if found.is_empty() {
                debug!("Listing page {} has no posts, stopping pagination", page);
                break;
            }
            info!("Found {} post links on listing page {}", found.len(), page);
            links.extend(found);
        }
        Ok(links)
    }

    /// Scrape one post under the retry policy. Only transient failures are
    /// retried; cancellation aborts between attempts.
    pub async fn scrape_post(
        &self,
        post_url: &str,
        token: &CancellationToken,
    ) -> Result<PostRecord> {
        with_retry_cancellable(
            &self.options.retry,
            token,
            HarvestError::is_transient,
            &TracingObserver,
            || self.fetch_post_once(post_url),
        )
        .await
    }

    async fn fetch_post_once(&self, post_url: &str) -> Result<PostRecord> {
        let html = self.fetcher.fetch(post_url).await?;
        let title = post::extract_title(&html)?;

        let body_html = match post::extract_frame_url(&html, post_url)? {
            Some(frame_url) => self.fetcher.fetch(&frame_url).await?,
            None => html,
        };
        let content = post::extract_body(&body_html)?;

        debug!("Scraped {}: {}", post_url, title);
        Ok(PostRecord { title, content })
    }

    /// Full crawl: listing pages, then every post. A post that exhausts its
    /// retries is logged and skipped; the crawl is best-effort. Cancellation
    /// aborts the whole run.
    pub async fn run(&self, token: &CancellationToken) -> Result<Vec<PostRecord>> {
        let links = self.collect_post_links().await?;
        info!("Scraping {} posts", links.len());

        let mut records = Vec::with_capacity(links.len());
        for link in &links {
            if token.is_cancelled() {
                return Err(HarvestError::Cancelled);
            }
            match self.scrape_post(link, token).await {
                Ok(record) => records.push(record),
                Err(HarvestError::Cancelled) => return Err(HarvestError::Cancelled),
                Err(err) => warn!("Skipping {} after failure: {}", link, err),
            }
        }
        Ok(records)
    }
}
