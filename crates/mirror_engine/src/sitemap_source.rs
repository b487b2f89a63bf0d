use std::fmt;
use std::path::PathBuf;

use mirror_logging::mirror_warn;
use thiserror::Error;

use crate::decode::decode_text;
use crate::fetch::Fetcher;
use crate::FetchError;

/// Where the sitemap document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapSource {
    File(PathBuf),
    Url(String),
    Inline(String),
}

impl SitemapSource {
    /// `http://` and `https://` arguments are fetched; anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        let lower = arg.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SitemapSource::Url(arg.trim().to_string())
        } else {
            SitemapSource::File(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for SitemapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitemapSource::File(path) => write!(f, "{}", path.display()),
            SitemapSource::Url(url) => write!(f, "{url}"),
            SitemapSource::Inline(_) => write!(f, "<inline sitemap>"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to read sitemap {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch sitemap: {0}")]
    Fetch(#[from] FetchError),
}

/// Load the raw sitemap text.
pub async fn load_sitemap(
    source: &SitemapSource,
    fetcher: &dyn Fetcher,
) -> Result<String, SitemapError> {
    let (bytes, content_type) = match source {
        SitemapSource::Inline(text) => return Ok(text.clone()),
        SitemapSource::File(path) => {
            let bytes = std::fs::read(path).map_err(|source| SitemapError::Read {
                path: path.clone(),
                source,
            })?;
            (bytes, None)
        }
        SitemapSource::Url(url) => {
            let output = fetcher.fetch(url).await?;
            (output.bytes, output.metadata.content_type)
        }
    };

    let decoded = decode_text(&bytes, content_type.as_deref());
    if decoded.had_errors {
        mirror_warn!(
            "Sitemap {} had invalid {} sequences",
            source,
            decoded.encoding_label
        );
    }
    Ok(decoded.text)
}
