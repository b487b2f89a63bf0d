use std::path::PathBuf;
use std::sync::Arc;

use mirror_core::{
    asset_filename, inject_network_guard, output_dir_name, NamingError, PageJob, PageOutcome,
    RunSummary, FALLBACK_ASSET_FILENAME, FALLBACK_STYLESHEET_FILENAME,
};
use mirror_logging::{mirror_debug, mirror_error, mirror_info, mirror_warn};
use serde::Deserialize;
use thiserror::Error;

use crate::assets::{binary_asset_refs, stylesheet_refs};
use crate::decode::decode_text;
use crate::fetch::Fetcher;
use crate::persist::{ensure_output_dir, AtomicFileWriter, PersistError};
use crate::render::{PageRenderer, RenderError};
use crate::rewrite::{rewrite_resource_urls, RewriteError};
use crate::{AssetRef, FetchError, MirrorEvent, PageReport, Stage};

/// Name of the rewritten page inside its output directory.
pub const INDEX_FILENAME: &str = "index.html";

/// What a failed stylesheet does to the rest of its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StylesheetPolicy {
    /// Stop the page; images and fonts are not fetched.
    #[default]
    AbortPage,
    /// Report it like any other asset failure and carry on.
    Tolerate,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Page directories are created directly under this root.
    pub output_root: PathBuf,
    pub stylesheet_policy: StylesheetPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            stylesheet_policy: StylesheetPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error("failed to write page: {0}")]
    Persist(#[from] PersistError),
    #[error("stylesheet {url}: {source}")]
    Stylesheet {
        url: String,
        #[source]
        source: AssetError,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: MirrorEvent);
}

/// Turns pipeline events into console log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: MirrorEvent) {
        match event {
            MirrorEvent::Progress { url, stage } => mirror_debug!("{:?}: {}", stage, url),
            MirrorEvent::AssetFailed {
                page_url,
                asset,
                error,
            } => mirror_error!(
                "Failed to download {}: {} (page {}): {}",
                asset.kind,
                asset.url,
                page_url,
                error
            ),
            MirrorEvent::PageCompleted { url, result } => match result {
                Ok(report) => mirror_info!(
                    "Crawled and saved: {} -> {} ({} stylesheets, {} assets, {} failed)",
                    url,
                    report.output_dir.display(),
                    report.stylesheets_written,
                    report.assets_written,
                    report.assets_failed
                ),
                Err(err) => mirror_error!("Failed to crawl: {}: {}", url, err),
            },
        }
    }
}

/// Mirrors pages one after another: render, rewrite, save, fetch resources.
pub struct Mirror {
    renderer: Arc<dyn PageRenderer>,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ProgressSink>,
    settings: PipelineSettings,
}

impl Mirror {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        fetcher: Arc<dyn Fetcher>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            renderer,
            fetcher,
            sink: Arc::new(LogSink),
            settings,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Process every job in order. A failing page never stops the run.
    pub async fn run(&self, jobs: &[PageJob]) -> RunSummary {
        let mut summary = RunSummary::new();
        for job in jobs {
            mirror_info!("[{}/{}] Crawling {}", job.position, jobs.len(), job.url);
            let result = self.mirror_page(&job.url).await;
            let outcome = match &result {
                Ok(report) => PageOutcome::Saved {
                    url: job.url.clone(),
                    assets_written: report.stylesheets_written + report.assets_written,
                    assets_failed: report.assets_failed,
                },
                Err(err) => PageOutcome::Failed {
                    url: job.url.clone(),
                    reason: err.to_string(),
                },
            };
            self.sink.emit(MirrorEvent::PageCompleted {
                url: job.url.clone(),
                result: result.map_err(|err| err.to_string()),
            });
            summary.record(outcome);
        }
        summary
    }

    /// Mirror a single page into `{output_root}/{output_dir_name(url)}`.
    ///
    /// `index.html` is written before any resource is fetched, so a page that
    /// fails on a stylesheet still leaves its markup behind.
    pub async fn mirror_page(&self, url: &str) -> Result<PageReport, PageError> {
        let output_dir = self.settings.output_root.join(output_dir_name(url)?);

        self.progress(url, Stage::Rendering);
        let rendered = self.renderer.render(url).await?;
        if rendered.final_url != url && !rendered.final_url.is_empty() {
            mirror_debug!("{} settled on {}", url, rendered.final_url);
        }

        self.progress(url, Stage::Rewriting);
        let html = inject_network_guard(&rewrite_resource_urls(&rendered.html, url)?);

        self.progress(url, Stage::WritingHtml);
        ensure_output_dir(&output_dir)?;
        let writer = AtomicFileWriter::new(output_dir.clone());
        writer.write(INDEX_FILENAME, &html)?;

        let mut report = PageReport {
            url: url.to_string(),
            output_dir,
            stylesheets_written: 0,
            assets_written: 0,
            assets_failed: 0,
        };

        self.progress(url, Stage::Stylesheets);
        for sheet in stylesheet_refs(&rendered) {
            match self.save_stylesheet(&writer, &sheet).await {
                Ok(()) => report.stylesheets_written += 1,
                Err(err) => match self.settings.stylesheet_policy {
                    StylesheetPolicy::AbortPage => {
                        return Err(PageError::Stylesheet {
                            url: sheet.url,
                            source: err,
                        });
                    }
                    StylesheetPolicy::Tolerate => {
                        report.assets_failed += 1;
                        self.asset_failed(url, sheet, &err);
                    }
                },
            }
        }

        self.progress(url, Stage::Assets);
        for asset in binary_asset_refs(&rendered, url) {
            match self.save_binary(&writer, &asset).await {
                Ok(()) => report.assets_written += 1,
                Err(err) => {
                    report.assets_failed += 1;
                    self.asset_failed(url, asset, &err);
                }
            }
        }

        self.progress(url, Stage::Done);
        Ok(report)
    }

    /// The sheet is saved byte for byte so its own `@charset` or BOM still
    /// describes the file; decoding only checks that it reads cleanly.
    async fn save_stylesheet(
        &self,
        writer: &AtomicFileWriter,
        sheet: &AssetRef,
    ) -> Result<(), AssetError> {
        let output = self.fetcher.fetch(&sheet.url).await?;
        let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref());
        if decoded.had_errors {
            mirror_warn!(
                "Stylesheet {} is not valid {}; saved as served",
                sheet.url,
                decoded.encoding_label
            );
        }
        let filename = asset_filename(&sheet.url, FALLBACK_STYLESHEET_FILENAME);
        writer.write(&filename, output.bytes)?;
        Ok(())
    }

    async fn save_binary(&self, writer: &AtomicFileWriter, asset: &AssetRef) -> Result<(), AssetError> {
        let output = self.fetcher.fetch(&asset.url).await?;
        let filename = asset_filename(&asset.url, FALLBACK_ASSET_FILENAME);
        writer.write(&filename, output.bytes)?;
        Ok(())
    }

    fn progress(&self, url: &str, stage: Stage) {
        self.sink.emit(MirrorEvent::Progress {
            url: url.to_string(),
            stage,
        });
    }

    fn asset_failed(&self, page_url: &str, asset: AssetRef, err: &AssetError) {
        self.sink.emit(MirrorEvent::AssetFailed {
            page_url: page_url.to_string(),
            asset,
            error: err.to_string(),
        });
    }
}
