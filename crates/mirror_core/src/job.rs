/// Number of sitemap entries crawled when nothing else is configured.
pub const DEFAULT_PAGE_LIMIT: usize = 3;

/// One page to crawl. `position` is 1-based within the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageJob {
    pub position: usize,
    pub url: String,
}

/// Keep the first `limit` sitemap entries, in order, as page jobs.
pub fn select_jobs(urls: Vec<String>, limit: usize) -> Vec<PageJob> {
    urls.into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, url)| PageJob {
            position: idx + 1,
            url,
        })
        .collect()
}
