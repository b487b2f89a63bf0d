use mirror_core::{extract_sitemap_urls, select_jobs, PageJob, DEFAULT_PAGE_LIMIT};
use pretty_assertions::assert_eq;

const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
   <url>
      <loc>https://shop.example.com/plan-trip</loc>
   </url>
   <url>
      <loc>https://shop.example.com/contact-us</loc>
   </url>
   <url>
      <loc>https://shop.example.com/#pay-form</loc>
   </url>
   <url>
      <loc>https://shop.example.com/help</loc>
   </url>
   <url>
      <loc>https://shop.example.com/plan-trip</loc>
   </url>
</urlset>
"#;

#[test]
fn extracts_locations_in_document_order_with_duplicates() {
    let urls = extract_sitemap_urls(SITEMAP);
    assert_eq!(
        urls,
        vec![
            "https://shop.example.com/plan-trip",
            "https://shop.example.com/contact-us",
            "https://shop.example.com/#pay-form",
            "https://shop.example.com/help",
            "https://shop.example.com/plan-trip",
        ]
    );
}

#[test]
fn empty_urlset_yields_nothing() {
    let xml = r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
    assert!(extract_sitemap_urls(xml).is_empty());
}

#[test]
fn malformed_input_degrades_to_empty() {
    for input in ["", "not xml at all", "<loc>", "<url><loc>unterminated", "</loc><loc"] {
        assert!(extract_sitemap_urls(input).is_empty(), "input {input:?}");
    }
}

#[test]
fn selection_truncates_to_limit_and_numbers_jobs() {
    let jobs = select_jobs(extract_sitemap_urls(SITEMAP), DEFAULT_PAGE_LIMIT);
    assert_eq!(
        jobs,
        vec![
            PageJob {
                position: 1,
                url: "https://shop.example.com/plan-trip".to_string()
            },
            PageJob {
                position: 2,
                url: "https://shop.example.com/contact-us".to_string()
            },
            PageJob {
                position: 3,
                url: "https://shop.example.com/#pay-form".to_string()
            },
        ]
    );
}

#[test]
fn selection_with_limit_above_size_keeps_everything() {
    let jobs = select_jobs(extract_sitemap_urls(SITEMAP), 100);
    assert_eq!(jobs.len(), 5);
    assert!(select_jobs(Vec::new(), 3).is_empty());
}
