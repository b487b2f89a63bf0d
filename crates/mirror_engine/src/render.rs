//! Page rendering: the seam between the mirror pipeline and a browser engine.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// A `@font-face` rule's `src` declaration as the browser reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFaceSource {
    /// Href of the declaring stylesheet; `None` for inline `<style>` sheets.
    pub stylesheet: Option<String>,
    pub src: String,
}

/// The state of a page after it finished loading in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    /// URL the browser ended up on, after redirects.
    pub final_url: String,
    /// Outer HTML of the document element.
    pub html: String,
    /// Hrefs of stylesheets loaded from the network, document order.
    pub stylesheets: Vec<String>,
    /// Resolved `src` of every image in the document.
    pub images: Vec<String>,
    pub font_faces: Vec<FontFaceSource>,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    #[error("navigation to {url} did not go idle within {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("page evaluation failed: {0}")]
    Evaluation(String),
}

#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Browser binary; `None` lets chromiumoxide look for an installed Chrome/Chromium.
    pub chrome_executable: Option<PathBuf>,
    /// Bound on navigation plus the wait for network idleness.
    pub navigation_timeout: Duration,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

/// Loads a URL in a browser and reports what the rendered page references.
///
/// Implementations own their browser for the duration of a call and must have
/// released it by the time `render` returns, whatever the outcome.
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;
}
