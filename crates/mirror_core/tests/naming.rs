use mirror_core::{
    asset_filename, output_dir_name, NamingError, FALLBACK_ASSET_FILENAME,
    FALLBACK_STYLESHEET_FILENAME,
};
use pretty_assertions::assert_eq;

#[test]
fn output_dir_joins_host_and_flattened_path() {
    assert_eq!(
        output_dir_name("https://example.com/a/b").unwrap(),
        "example.com_a_b"
    );
    assert_eq!(
        output_dir_name("https://example.com/page").unwrap(),
        "example.com_page"
    );
}

#[test]
fn output_dir_is_deterministic_and_ignores_query_and_fragment() {
    let first = output_dir_name("https://example.com/docs/intro?lang=en#top").unwrap();
    let second = output_dir_name("https://example.com/docs/intro?lang=en#top").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "example.com_docs_intro");
    assert_eq!(output_dir_name("https://example.com/#pay-form").unwrap(), "example.com_");
}

#[test]
fn output_dir_rejects_unusable_urls() {
    assert!(matches!(
        output_dir_name("not a url"),
        Err(NamingError::InvalidUrl { .. })
    ));
    assert!(matches!(
        output_dir_name("mailto:someone@example.com"),
        Err(NamingError::MissingHost { .. })
    ));
}

#[test]
fn asset_filename_uses_last_path_segment() {
    assert_eq!(
        asset_filename("https://cdn.example.com/css/site.css?v=3", FALLBACK_STYLESHEET_FILENAME),
        "site.css"
    );
    assert_eq!(
        asset_filename("https://cdn.example.com/img/logo.png", FALLBACK_ASSET_FILENAME),
        "logo.png"
    );
}

#[test]
fn asset_filename_falls_back_when_no_segment() {
    assert_eq!(
        asset_filename("https://cdn.example.com/", FALLBACK_STYLESHEET_FILENAME),
        "styles.css"
    );
    assert_eq!(
        asset_filename("https://cdn.example.com/fonts/", FALLBACK_ASSET_FILENAME),
        "asset"
    );
    assert_eq!(asset_filename("::::", FALLBACK_ASSET_FILENAME), "asset");
}

#[test]
fn asset_filename_replaces_characters_unsafe_on_disk() {
    assert_eq!(
        asset_filename("https://cdn.example.com/a/weird:name*.woff2", FALLBACK_ASSET_FILENAME),
        "weird_name_.woff2"
    );
}

#[test]
fn naming_errors_describe_the_url() {
    let err: Box<dyn std::error::Error> = Box::new(output_dir_name("mailto:someone@example.com").unwrap_err());
    assert_eq!(err.to_string(), "url has no host: mailto:someone@example.com");

    let err = output_dir_name("not a url").unwrap_err();
    assert!(err.to_string().starts_with("invalid url not a url: "));
}
