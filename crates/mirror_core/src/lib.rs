//! Mirror core: pure, IO-free rules for turning a sitemap into saved pages.
mod inject;
mod job;
mod naming;
mod sitemap;
mod summary;

pub use inject::{inject_network_guard, NETWORK_GUARD_JS, NETWORK_GUARD_SCRIPT};
pub use job::{select_jobs, PageJob, DEFAULT_PAGE_LIMIT};
pub use naming::{
    asset_filename, output_dir_name, NamingError, FALLBACK_ASSET_FILENAME,
    FALLBACK_STYLESHEET_FILENAME,
};
pub use sitemap::extract_sitemap_urls;
pub use summary::{PageOutcome, RunSummary};
