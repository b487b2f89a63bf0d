//! Text decoding for stylesheets and sitemaps.

use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::bytes::Regex;

/// `@charset "x";` must be the very first bytes of a stylesheet.
static CSS_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^@charset "([^"]{1,40})";"#).expect("static @charset pattern"));

/// Encoding pseudo-attribute of a leading `<?xml ...?>` declaration.
static XML_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._:-]{1,40})["']"#)
        .expect("static xml declaration pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode fetched bytes to a `String`.
///
/// The encoding is taken from the first of: byte order mark, `charset` in
/// `Content-Type`, an in-document declaration (`@charset` or `<?xml encoding`),
/// statistical detection. Decoding never fails; bad sequences are replaced
/// and flagged in [`DecodedText::had_errors`].
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> DecodedText {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| content_type.and_then(header_charset).and_then(label_to_encoding))
        .or_else(|| declared_charset(bytes).and_then(label_to_encoding))
        .unwrap_or_else(|| detect(bytes));

    let (text, used, had_errors) = encoding.decode(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
        had_errors,
    }
}

fn header_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}

fn declared_charset(bytes: &[u8]) -> Option<&str> {
    let caps = CSS_CHARSET
        .captures(bytes)
        .or_else(|| XML_ENCODING.captures(bytes))?;
    std::str::from_utf8(caps.get(1)?.as_bytes()).ok()
}

fn label_to_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

fn detect(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}
