//! Chromium-backed [`PageRenderer`] using chromiumoxide.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, EventLifecycleEvent, NavigateParams,
    SetLifecycleEventsEnabledParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures_util::StreamExt;
use mirror_core::NETWORK_GUARD_JS;
use mirror_logging::{mirror_debug, mirror_warn};
use tokio::task::JoinHandle;

use crate::render::{PageRenderer, RenderError, RenderedPage, RendererSettings};

/// Chromium's lifecycle event for "no network connections for 500ms".
const NETWORK_IDLE: &str = "networkIdle";

/// Collects the markup and the resources the pipeline saves next to it.
/// Cross-origin sheets refuse `cssRules` access; they still count as
/// stylesheets but contribute no font faces.
const SNAPSHOT_JS: &str = r#"(() => {
  const sheets = Array.from(document.styleSheets);
  const fontFaces = [];
  for (const sheet of sheets) {
    let rules;
    try {
      rules = Array.from(sheet.cssRules);
    } catch (e) {
      continue;
    }
    for (const rule of rules) {
      if (rule.type === CSSRule.FONT_FACE_RULE) {
        fontFaces.push({ stylesheet: sheet.href, src: rule.style.getPropertyValue('src') });
      }
    }
  }
  return {
    finalUrl: location.href,
    html: document.documentElement.outerHTML,
    stylesheets: sheets.map(sheet => sheet.href).filter(href => href !== null),
    images: Array.from(document.images).map(img => img.src),
    fontFaces,
  };
})()"#;

/// Launches a fresh headless Chromium for every page and closes it afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    settings: RendererSettings,
}

impl ChromiumRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    async fn launch(&self) -> Result<(Browser, JoinHandle<()>), RenderError> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(self.settings.navigation_timeout)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");
        if let Some(path) = &self.settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| RenderError::Launch(err.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    mirror_debug!("Browser handler error: {}", err);
                }
            }
        });

        Ok((browser, handler_task))
    }

    async fn render_in(&self, browser: &Browser, url: &str) -> Result<RenderedPage, RenderError> {
        let nav_err = |err: chromiumoxide::error::CdpError| RenderError::Navigation {
            url: url.to_string(),
            message: err.to_string(),
        };

        let page = browser.new_page("about:blank").await.map_err(nav_err)?;
        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
            NETWORK_GUARD_JS,
        ))
        .await
        .map_err(nav_err)?;

        let timeout = self.settings.navigation_timeout;
        match tokio::time::timeout(timeout, navigate_until_idle(&page, url)).await {
            Ok(result) => result?,
            Err(_) => {
                close_page(page).await;
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout,
                });
            }
        }

        let snapshot = snapshot(&page).await;
        close_page(page).await;
        snapshot
    }
}

#[async_trait::async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let (mut browser, handler_task) = self.launch().await?;

        let result = self.render_in(&browser, url).await;

        if let Err(err) = browser.close().await {
            mirror_warn!("Failed to close browser after {}: {}", url, err);
        }
        if let Err(err) = browser.wait().await {
            mirror_debug!("Browser process did not exit cleanly: {}", err);
        }
        handler_task.abort();

        result
    }
}

async fn navigate_until_idle(page: &Page, url: &str) -> Result<(), RenderError> {
    let nav_err = |message: String| RenderError::Navigation {
        url: url.to_string(),
        message,
    };

    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await
        .map_err(|err| nav_err(err.to_string()))?;
    let mut lifecycle = page
        .event_listener::<EventLifecycleEvent>()
        .await
        .map_err(|err| nav_err(err.to_string()))?;

    let navigated = page
        .execute(NavigateParams::new(url))
        .await
        .map_err(|err| nav_err(err.to_string()))?;
    if let Some(error_text) = navigated.result.error_text.clone() {
        return Err(nav_err(error_text));
    }
    let frame_id = navigated.result.frame_id.clone();
    let loader_id = navigated.result.loader_id.clone();

    // Events for about:blank may still be buffered; only the navigation's own
    // loader counts.
    while let Some(event) = lifecycle.next().await {
        if event.name != NETWORK_IDLE || event.frame_id != frame_id {
            continue;
        }
        if loader_id.as_ref().map_or(true, |id| *id == event.loader_id) {
            mirror_debug!("Network idle for {}", url);
            return Ok(());
        }
    }

    Err(nav_err("page closed before the network went idle".to_string()))
}

async fn snapshot(page: &Page) -> Result<RenderedPage, RenderError> {
    let params = EvaluateParams::builder()
        .expression(SNAPSHOT_JS)
        .return_by_value(true)
        .await_promise(true)
        .build()
        .map_err(RenderError::Evaluation)?;

    page.evaluate_expression(params)
        .await
        .map_err(|err| RenderError::Evaluation(err.to_string()))?
        .into_value::<RenderedPage>()
        .map_err(|err| RenderError::Evaluation(err.to_string()))
}

async fn close_page(page: Page) {
    if let Err(err) = page.close().await {
        mirror_debug!("Failed to close page: {}", err);
    }
}
