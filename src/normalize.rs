/// Image URL canonicalization for Bookmark Hoarder
use std::collections::HashSet;

use url::Url;

/// Host serving post media
const MEDIA_HOST: &str = "pbs.twimg.com";

/// Map a scraped image URL to its canonical large-format URL
///
/// Algorithm:
/// 1. Parse the URL (protocol-relative `//host/...` is read as https)
/// 2. Reject anything that is not `pbs.twimg.com/media/<name>`; avatars,
///    emoji and card thumbnails live under other paths
/// 3. Drop the query, the fragment, any legacy `:size` suffix and the
///    file extension from `<name>`, leaving the media id
/// 4. Rebuild as `https://pbs.twimg.com/media/<id>?format=jpg&name=large`
///
/// Examples:
/// - https://pbs.twimg.com/media/F1a2?format=png&name=small → .../media/F1a2?format=jpg&name=large
/// - https://pbs.twimg.com/media/F1a2.jpg:thumb → .../media/F1a2?format=jpg&name=large
/// - https://pbs.twimg.com/profile_images/1/me_normal.jpg → None
pub fn normalize_image_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let parsed = if raw.starts_with("//") {
        Url::parse(&format!("https:{}", raw)).ok()?
    } else {
        Url::parse(raw).ok()?
    };

    if parsed.host_str()? != MEDIA_HOST {
        return None;
    }

    let segments: Vec<&str> = parsed.path_segments()?.collect();
    let [kind, name] = segments.as_slice() else {
        return None;
    };
    if *kind != "media" {
        return None;
    }

    let media_id = name.split(':').next()?.split('.').next()?;
    if media_id.is_empty() {
        return None;
    }

    Some(format!(
        "https://{}/media/{}?format=jpg&name=large",
        MEDIA_HOST, media_id
    ))
}

/// Remove exact duplicates, keeping the first occurrence of each URL
pub fn dedupe_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for url in urls {
        if seen.insert(url.clone()) {
            unique.push(url);
        }
    }

    unique
}

/// Normalize every scraped source and dedupe the survivors
pub fn normalize_images<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    dedupe_urls(sources.into_iter().filter_map(normalize_image_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LARGE: &str = "https://pbs.twimg.com/media/GabcXYZ?format=jpg&name=large";

    #[test]
    fn test_normalize_size_variants_agree() {
        let variants = [
            "https://pbs.twimg.com/media/GabcXYZ?format=jpg&name=small",
            "https://pbs.twimg.com/media/GabcXYZ?format=jpg&name=360x360",
            "https://pbs.twimg.com/media/GabcXYZ?format=png&name=900x900",
            "https://pbs.twimg.com/media/GabcXYZ?format=webp&name=orig",
            "https://pbs.twimg.com/media/GabcXYZ.jpg",
            "https://pbs.twimg.com/media/GabcXYZ.jpg:large",
            "https://pbs.twimg.com/media/GabcXYZ.png?name=thumb",
            "//pbs.twimg.com/media/GabcXYZ?name=medium",
            "  https://pbs.twimg.com/media/GabcXYZ#frag  ",
        ];

        for variant in variants {
            assert_eq!(normalize_image_url(variant).as_deref(), Some(LARGE), "{}", variant);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        assert_eq!(normalize_image_url(LARGE).as_deref(), Some(LARGE));
    }

    #[test]
    fn test_normalize_rejects_non_media() {
        assert_eq!(normalize_image_url("https://pbs.twimg.com/profile_images/123/me_normal.jpg"), None);
        assert_eq!(normalize_image_url("https://pbs.twimg.com/ext_tw_video_thumb/1/pu/img/a.jpg"), None);
        assert_eq!(normalize_image_url("https://abs-0.twimg.com/emoji/v2/svg/1f600.svg"), None);
        assert_eq!(normalize_image_url("https://example.com/media/abc.jpg"), None);
        assert_eq!(normalize_image_url("https://pbs.twimg.com/media/"), None);
        assert_eq!(normalize_image_url("not a url"), None);
        assert_eq!(normalize_image_url(""), None);
    }

    #[test]
    fn test_dedupe_urls_keeps_first_occurrence() {
        let urls = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];

        assert_eq!(dedupe_urls(urls), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_normalize_images_dedupes_after_canonicalization() {
        let sources = [
            "https://pbs.twimg.com/media/One?format=jpg&name=small",
            "https://pbs.twimg.com/profile_images/9/avatar.jpg",
            "https://pbs.twimg.com/media/Two.png",
            "https://pbs.twimg.com/media/One?format=jpg&name=900x900",
        ];

        let images = normalize_images(sources);

        assert_eq!(
            images,
            vec![
                "https://pbs.twimg.com/media/One?format=jpg&name=large",
                "https://pbs.twimg.com/media/Two?format=jpg&name=large",
            ]
        );
    }
}
