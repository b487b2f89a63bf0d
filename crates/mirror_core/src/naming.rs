use thiserror::Error;
use url::Url;

/// Filename used for a stylesheet whose URL has no final path segment.
pub const FALLBACK_STYLESHEET_FILENAME: &str = "styles.css";
/// Filename used for an image or font whose URL has no final path segment.
pub const FALLBACK_ASSET_FILENAME: &str = "asset";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("url has no host: {url}")]
    MissingHost { url: String },
}

/// Directory name for a page: `{host}{path with '/' replaced by '_'}`.
///
/// `https://example.com/a/b` becomes `example.com_a_b`. Query and fragment
/// do not take part, so `https://example.com/#x` maps to `example.com_`.
pub fn output_dir_name(url: &str) -> Result<String, NamingError> {
    let parsed = Url::parse(url).map_err(|err| NamingError::InvalidUrl {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    let host = parsed
        .host_str()
        .ok_or_else(|| NamingError::MissingHost {
            url: url.to_string(),
        })?;
    Ok(format!("{host}{}", parsed.path().replace('/', "_")))
}

/// Local filename for a fetched resource: the URL's last path segment, or
/// `fallback` when there is none.
pub fn asset_filename(url: &str, fallback: &str) -> String {
    let segment = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string)
    });

    match segment.map(|s| sanitize_segment(&s)) {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name,
        _ => fallback.to_string(),
    }
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
