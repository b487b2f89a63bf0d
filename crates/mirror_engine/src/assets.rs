use std::sync::LazyLock;

use mirror_logging::mirror_debug;
use regex::Regex;
use url::Url;

use crate::render::RenderedPage;
use crate::{AssetKind, AssetRef};

static CSS_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(['"]?(.+?)['"]?\)"#).expect("static css url pattern")
});

/// Network stylesheets of a rendered page, in document order. Sheets that are
/// not http(s), such as `data:` hrefs, need no download and are dropped.
pub fn stylesheet_refs(page: &RenderedPage) -> Vec<AssetRef> {
    page.stylesheets
        .iter()
        .map(|href| AssetRef {
            url: href.clone(),
            kind: AssetKind::Stylesheet,
        })
        .filter(fetchable)
        .collect()
}

/// Images followed by font-face sources. Font URLs are resolved against the
/// stylesheet that declared them, or `page_url` for inline styles. Anything
/// that is not http(s) (for example `data:` images) is dropped.
pub fn binary_asset_refs(page: &RenderedPage, page_url: &str) -> Vec<AssetRef> {
    let images = page.images.iter().map(|src| AssetRef {
        url: src.clone(),
        kind: AssetKind::Image,
    });

    let fonts = page.font_faces.iter().flat_map(|face| {
        let base = face.stylesheet.as_deref().unwrap_or(page_url);
        css_urls(&face.src)
            .into_iter()
            .filter_map(move |raw| resolve(base, &raw))
            .map(|url| AssetRef {
                url,
                kind: AssetKind::Font,
            })
    });

    images
        .chain(fonts)
        .filter(fetchable)
        .collect()
}

fn fetchable(asset: &AssetRef) -> bool {
    let http = is_http(&asset.url);
    if !http {
        mirror_debug!("Skipping non-http {} {}", asset.kind, preview(&asset.url));
    }
    http
}

/// Every `url(...)` reference in a CSS value, quotes stripped.
pub fn css_urls(value: &str) -> Vec<String> {
    CSS_URL_PATTERN
        .captures_iter(value)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn resolve(base: &str, reference: &str) -> Option<String> {
    let joined = Url::parse(base).and_then(|base| base.join(reference));
    match joined {
        Ok(url) => Some(url.into()),
        Err(err) => {
            mirror_debug!("Cannot resolve {} against {}: {}", reference, base, err);
            None
        }
    }
}

fn is_http(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn preview(url: &str) -> &str {
    match url.char_indices().nth(64) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}
