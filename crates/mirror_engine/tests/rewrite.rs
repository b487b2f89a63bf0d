use mirror_engine::rewrite_resource_urls;
use pretty_assertions::assert_eq;
use scraper::{Html, Selector};

const BASE: &str = "https://example.com/docs/guide";

const PAGE: &str = r##"<html><head>
<link rel="stylesheet" href="css/site.css">
<link rel="icon" href="https://cdn.example.net/favicon.ico">
<script src="/js/app.js"></script>
<script>var inline = "./not-an-attribute";</script>
</head><body>
<a href="../about">About</a>
<a href="#section">Jump</a>
<a href="mailto:team@example.com">Mail</a>
<a href="//cdn.example.net/x">Protocol relative</a>
<a>No href</a>
<img src="img/logo.png">
<img src="data:image/gif;base64,R0lGODlhAQABAAAAACw=">
<form action="submit?x=1"><input type="text" src="left/alone"></form>
<div data-src="left/alone"></div>
</body></html>"##;

fn attr(html: &str, selector: &str, name: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .filter_map(|el| el.value().attr(name).map(str::to_string))
        .collect()
}

#[test]
fn relative_references_become_absolute() {
    let out = rewrite_resource_urls(PAGE, BASE).unwrap();

    assert_eq!(
        attr(&out, "link", "href"),
        vec![
            "https://example.com/docs/css/site.css",
            "https://cdn.example.net/favicon.ico",
        ]
    );
    assert_eq!(
        attr(&out, "script[src]", "src"),
        vec!["https://example.com/js/app.js"]
    );
    assert_eq!(
        attr(&out, "a", "href"),
        vec![
            "https://example.com/about",
            "https://example.com/docs/guide#section",
            "mailto:team@example.com",
            "//cdn.example.net/x",
        ]
    );
    assert_eq!(
        attr(&out, "img", "src"),
        vec![
            "https://example.com/docs/img/logo.png",
            "data:image/gif;base64,R0lGODlhAQABAAAAACw=",
        ]
    );
    assert_eq!(
        attr(&out, "form", "action"),
        vec!["https://example.com/docs/submit?x=1"]
    );
}

#[test]
fn other_elements_and_script_bodies_are_untouched() {
    let out = rewrite_resource_urls(PAGE, BASE).unwrap();

    assert_eq!(attr(&out, "input", "src"), vec!["left/alone"]);
    assert_eq!(attr(&out, "div", "data-src"), vec!["left/alone"]);
    assert!(out.contains(r#"var inline = "./not-an-attribute";"#));
}

#[test]
fn output_is_the_document_element() {
    let out = rewrite_resource_urls(PAGE, BASE).unwrap();
    assert!(out.starts_with("<html>"));
    assert!(out.ends_with("</html>"));
    assert!(out.contains("</head>"));
}

#[test]
fn rewriting_is_idempotent() {
    let once = rewrite_resource_urls(PAGE, BASE).unwrap();
    let twice = rewrite_resource_urls(&once, BASE).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn invalid_base_is_an_error() {
    assert!(rewrite_resource_urls(PAGE, "relative/base").is_err());
}
