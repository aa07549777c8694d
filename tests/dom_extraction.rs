//! Extraction against real DOM documents. Run with
//! `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use bookmark_hoarder::extract::{extract_candidates, parse_markup};
use bookmark_hoarder::merge::merge_extracted;
use bookmark_hoarder::record::Bookmarks;
use url::Url;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn page() -> Url {
    Url::parse("https://x.com/i/bookmarks").unwrap()
}

fn article(id: &str, author: &str, text: Option<&str>, images: &[&str]) -> String {
    let text = text
        .map(|t| format!(r#"<div data-testid="tweetText"><span>{}</span></div>"#, t))
        .unwrap_or_default();
    let images: String = images
        .iter()
        .map(|src| format!(r#"<div data-testid="tweetPhoto"><img src="{}"></div>"#, src))
        .collect();

    format!(
        r#"<article data-testid="tweet">
            <img src="https://pbs.twimg.com/profile_images/1/{author}_normal.jpg">
            <div data-testid="User-Name">
                <a href="/{author}">{author}</a>
                <a href="/{author}/status/{id}"><time>1h</time></a>
            </div>
            {text}
            {images}
        </article>"#
    )
}

fn page_markup(articles: &[String]) -> String {
    format!(
        "<html><body><main>{}</main></body></html>",
        articles.concat()
    )
}

#[wasm_bindgen_test]
fn test_extracts_posts_with_media() {
    let markup = page_markup(&[
        article(
            "100",
            "ferris",
            Some("Crab spotted"),
            &[
                "https://pbs.twimg.com/media/AAA?format=jpg&name=small",
                "https://pbs.twimg.com/media/BBB?format=png&name=900x900",
                "https://pbs.twimg.com/media/AAA?format=jpg&name=360x360",
            ],
        ),
        article("200", "rustlang", None, &["https://pbs.twimg.com/media/CCC.jpg"]),
    ]);
    let document = parse_markup(&markup).unwrap();

    let candidates = extract_candidates(&document, &page()).unwrap();

    assert_eq!(candidates.len(), 2);
    let first = &candidates[0];
    assert_eq!(first.id, "100");
    assert_eq!(first.author, "ferris");
    assert_eq!(first.source_url, "https://x.com/ferris/status/100");
    assert_eq!(first.text, "Crab spotted");
    assert_eq!(
        first.images,
        vec![
            "https://pbs.twimg.com/media/AAA?format=jpg&name=large",
            "https://pbs.twimg.com/media/BBB?format=jpg&name=large",
        ]
    );
    assert_eq!(candidates[1].text, "");
}

#[wasm_bindgen_test]
fn test_profile_pictures_alone_yield_nothing() {
    let markup = page_markup(&[article("300", "ferris", Some("No photos"), &[])]);
    let document = parse_markup(&markup).unwrap();

    assert!(extract_candidates(&document, &page()).unwrap().is_empty());
}

#[wasm_bindgen_test]
fn test_skips_containers_without_permalink_and_duplicates() {
    let broken = r#"<article data-testid="tweet"><img src="https://pbs.twimg.com/media/ZZZ.jpg"></article>"#;
    let markup = page_markup(&[
        broken.to_string(),
        article("400", "ferris", None, &["https://pbs.twimg.com/media/DDD.jpg"]),
        article("400", "ferris", None, &["https://pbs.twimg.com/media/EEE.jpg"]),
    ]);
    let document = parse_markup(&markup).unwrap();

    let candidates = extract_candidates(&document, &page()).unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "400");
    assert_eq!(candidates[0].images, vec!["https://pbs.twimg.com/media/DDD?format=jpg&name=large"]);
}

#[wasm_bindgen_test]
fn test_extract_then_merge_twice() {
    let markup = page_markup(&[article("500", "ferris", None, &["https://pbs.twimg.com/media/FFF.jpg"])]);
    let document = parse_markup(&markup).unwrap();

    let first = merge_extracted(
        Bookmarks::new(),
        extract_candidates(&document, &page()).unwrap(),
        "2020-01-01",
    );
    let second = merge_extracted(
        first.bookmarks.clone(),
        extract_candidates(&document, &page()).unwrap(),
        "2024-01-01",
    );

    assert_eq!(first.new_count, 1);
    assert_eq!(second.new_count, 0);
    assert_eq!(second.bookmarks["500"].saved_at, "2020-01-01");
}
