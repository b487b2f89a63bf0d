use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use mirror_logging::mirror_trace;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid base url {url}: {message}")]
    InvalidBase { url: String, message: String },
    #[error("document has no root element")]
    MissingRoot,
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] std::io::Error),
    #[error("serialized document is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Make every relative `href`/`src`/`action` on anchors, images, scripts,
/// links and forms absolute against `base_url`, and return the outer HTML of
/// the document element.
///
/// Values that already carry a scheme, start with `//` or are `data:` URIs are
/// left alone, so running this twice gives the same output.
pub fn rewrite_resource_urls(html: &str, base_url: &str) -> Result<String, RewriteError> {
    let base = Url::parse(base_url).map_err(|err| RewriteError::InvalidBase {
        url: base_url.to_string(),
        message: err.to_string(),
    })?;

    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    rewrite_subtree(&dom.document, &base);

    let root = document_element(&dom.document).ok_or(RewriteError::MissingRoot)?;
    let mut out = Vec::with_capacity(html.len());
    serialize(
        &mut out,
        &SerializableHandle::from(root),
        SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        },
    )?;
    Ok(String::from_utf8(out)?)
}

/// Resolve `value` against `base` unless it already looks absolute.
///
/// Returns `None` when the value should stay as written: empty, already
/// absolute, or not resolvable.
pub fn absolutize(value: &str, base: &Url) -> Option<String> {
    if value.is_empty() || looks_absolute(value) {
        return None;
    }
    base.join(value).ok().map(String::from)
}

fn looks_absolute(value: &str) -> bool {
    value.starts_with("//") || value.starts_with("data:") || has_scheme(value)
}

fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn rewritten_attribute(tag: &str) -> Option<&'static str> {
    match tag {
        "a" | "link" => Some("href"),
        "img" | "script" => Some("src"),
        "form" => Some("action"),
        _ => None,
    }
}

fn rewrite_subtree(node: &Handle, base: &Url) {
    if let NodeData::Element { name, attrs, .. } = &node.data {
        if let Some(attr_name) = rewritten_attribute(&name.local) {
            let mut attrs = attrs.borrow_mut();
            if let Some(attr) = attrs
                .iter_mut()
                .find(|attr| attr.name.ns.is_empty() && &*attr.name.local == attr_name)
            {
                if let Some(absolute) = absolutize(&attr.value, base) {
                    mirror_trace!("<{}> {}: {} -> {}", &*name.local, attr_name, &*attr.value, absolute);
                    attr.value = StrTendril::from_slice(&absolute);
                }
            }
        }
    }

    for child in node.children.borrow().iter() {
        rewrite_subtree(child, base);
    }
}

fn document_element(document: &Handle) -> Option<Handle> {
    document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
}
