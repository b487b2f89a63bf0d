//! Mirror engine: rendering, rewriting, fetching and persisting pages.
mod assets;
mod chromium;
mod decode;
mod fetch;
mod persist;
mod pipeline;
mod render;
mod rewrite;
mod sitemap_source;
mod types;

pub use assets::{binary_asset_refs, css_urls, stylesheet_refs};
pub use chromium::ChromiumRenderer;
pub use decode::{decode_text, DecodedText};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::{
    AssetError, LogSink, Mirror, PageError, PipelineSettings, ProgressSink, StylesheetPolicy,
    INDEX_FILENAME,
};
pub use render::{FontFaceSource, PageRenderer, RenderError, RenderedPage, RendererSettings};
pub use rewrite::{absolutize, rewrite_resource_urls, RewriteError};
pub use sitemap_source::{load_sitemap, SitemapError, SitemapSource};
pub use types::{
    AssetKind, AssetRef, FailureKind, FetchError, FetchMetadata, FetchOutput, MirrorEvent,
    PageReport, Stage,
};
