/// Bookmark extraction from a bookmarks page document
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DomParser, Element, NodeList, SupportedType};

use crate::error::ExtractError;
use crate::normalize::normalize_images;
use crate::record::Candidate;

const POST_SELECTOR: &str = r#"article[data-testid="tweet"]"#;
const PERMALINK_SELECTOR: &str = r#"a[href*="/status/"]"#;
const PROFILE_LINK_SELECTOR: &str = r#"[data-testid="User-Name"] a[href]"#;
const TEXT_SELECTOR: &str = r#"[data-testid="tweetText"]"#;
const IMAGE_SELECTOR: &str = r#"img[src*="media"]"#;

static STATUS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status/(\d+)").expect("status id pattern compiles"));

/// Top-level paths that look like a handle but are not one
const RESERVED_PATHS: &[&str] = &[
    "i",
    "home",
    "explore",
    "search",
    "notifications",
    "messages",
    "settings",
    "hashtag",
    "compose",
];

/// True when the address points at the bookmarks view
pub fn is_bookmarks_page(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .map(|mut segments| segments.any(|segment| segment == "bookmarks"))
        })
        .unwrap_or(false)
}

/// A post's permalink, resolved and trimmed to `<origin>/<handle>/status/<id>`
#[derive(Debug, Clone, PartialEq)]
pub struct Permalink {
    pub id: String,
    pub handle: Option<String>,
    pub url: String,
}

pub fn parse_permalink(href: &str, page_url: &Url) -> Option<Permalink> {
    let resolved = page_url.join(href.trim()).ok()?;
    let id = STATUS_ID.captures(resolved.path())?.get(1)?.as_str().to_string();

    let segments: Vec<&str> = resolved.path_segments()?.collect();
    let handle = segments
        .iter()
        .position(|segment| *segment == "status")
        .filter(|position| *position == 1)
        .map(|_| segments[0])
        .filter(|handle| is_handle(handle))
        .map(str::to_string);

    let origin = resolved.origin().ascii_serialization();
    let url = match &handle {
        Some(handle) => format!("{}/{}/status/{}", origin, handle, id),
        None => format!("{}/i/web/status/{}", origin, id),
    };

    Some(Permalink { id, handle, url })
}

/// Handle from a profile link such as `/rustlang`
pub fn profile_handle(href: &str, page_url: &Url) -> Option<String> {
    let resolved = page_url.join(href.trim()).ok()?;
    let segments: Vec<&str> = resolved
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments.as_slice() {
        [handle] if is_handle(handle) => Some(handle.to_string()),
        _ => None,
    }
}

fn is_handle(segment: &str) -> bool {
    !segment.is_empty()
        && !RESERVED_PATHS.contains(&segment)
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Attribute values read from one post container, before interpretation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPost {
    pub permalink: Option<String>,
    pub profile_links: Vec<String>,
    pub text: Option<String>,
    pub image_sources: Vec<String>,
}

impl RawPost {
    /// Interpret the scraped values as a candidate.
    ///
    /// Posts without a status id or without post media yield `None`.
    pub fn into_candidate(self, page_url: &Url) -> Option<Candidate> {
        let permalink = parse_permalink(self.permalink.as_deref()?, page_url)?;

        let author = self
            .profile_links
            .iter()
            .find_map(|href| profile_handle(href, page_url))
            .or_else(|| permalink.handle.clone())
            .unwrap_or_default();

        let images = normalize_images(self.image_sources.iter().map(String::as_str));

        Candidate::new(
            &permalink.id,
            &permalink.url,
            &author,
            self.text.as_deref().unwrap_or_default(),
            images,
        )
    }
}

/// Turn raw posts into candidates, one per post id.
///
/// Containers that failed to read are logged and skipped; the rest of the
/// batch is unaffected.
pub fn collect_candidates<I>(posts: I, page_url: &Url) -> Vec<Candidate>
where
    I: IntoIterator<Item = Result<RawPost, ExtractError>>,
{
    let mut seen_ids = HashSet::new();
    let mut candidates = Vec::new();

    for (index, post) in posts.into_iter().enumerate() {
        let post = match post {
            Ok(post) => post,
            Err(e) => {
                log::debug!("Skipping post container {}: {}", index, e);
                continue;
            }
        };

        match post.into_candidate(page_url) {
            Some(candidate) => {
                if seen_ids.insert(candidate.id.clone()) {
                    candidates.push(candidate);
                }
            }
            None => log::debug!("Post container {} has no id or no media", index),
        }
    }

    candidates
}

/// Parse captured page markup into a detached document.
///
/// Nothing in a parsed document runs scripts or fetches images, so the
/// extractor can query it freely.
pub fn parse_markup(markup: &str) -> Result<Document, ExtractError> {
    let parser = DomParser::new().map_err(dom_error)?;
    parser
        .parse_from_string(markup, SupportedType::TextHtml)
        .map_err(dom_error)
}

/// Walk every post container of `document` and return its candidates
pub fn extract_candidates(document: &Document, page_url: &Url) -> Result<Vec<Candidate>, ExtractError> {
    let articles = query_all(document.query_selector_all(POST_SELECTOR))?;
    log::info!("Found {} post containers", articles.len());

    let candidates = collect_candidates(articles.iter().map(read_post), page_url);
    log::info!("Extracted {} posts with media", candidates.len());

    Ok(candidates)
}

/// Read the raw values of one post container
pub fn read_post(article: &Element) -> Result<RawPost, ExtractError> {
    let permalink = article
        .query_selector(PERMALINK_SELECTOR)
        .map_err(dom_error)?
        .and_then(|link| link.get_attribute("href"));

    let profile_links = query_all(article.query_selector_all(PROFILE_LINK_SELECTOR))?
        .iter()
        .filter_map(|link| link.get_attribute("href"))
        .collect();

    let text = article
        .query_selector(TEXT_SELECTOR)
        .map_err(dom_error)?
        .and_then(|node| node.text_content());

    let image_sources = query_all(article.query_selector_all(IMAGE_SELECTOR))?
        .iter()
        .filter_map(|img| img.get_attribute("src"))
        .collect();

    Ok(RawPost {
        permalink,
        profile_links,
        text,
        image_sources,
    })
}

fn query_all(result: Result<NodeList, JsValue>) -> Result<Vec<Element>, ExtractError> {
    let list = result.map_err(dom_error)?;
    let mut elements = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        let node = list
            .item(index)
            .ok_or_else(|| ExtractError::Dom(format!("node {} vanished", index)))?;
        if let Some(element) = node.dyn_ref::<Element>() {
            elements.push(element.clone());
        }
    }
    Ok(elements)
}

fn dom_error(e: JsValue) -> ExtractError {
    ExtractError::Dom(format!("{:?}", e))
}
