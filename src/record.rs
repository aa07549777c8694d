/// Data structures for Bookmark Hoarder
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::dedupe_urls;

/// Longest post excerpt kept on a record, in characters
pub const TEXT_LIMIT: usize = 200;

/// Author handle used when a post's author cannot be resolved
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Persisted collection, keyed by post id
pub type Bookmarks = BTreeMap<String, Record>;

/// A post scraped from the bookmarks page that has not been saved yet
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub source_url: String,
    pub author: String,
    pub author_url: String,
    pub text: String,
    pub images: Vec<String>,
}

impl Candidate {
    /// Build a candidate from scraped values.
    ///
    /// Returns `None` when the id is empty or no image survives
    /// deduplication, since such a post can never be persisted.
    pub fn new(
        id: &str,
        source_url: &str,
        author: &str,
        text: &str,
        images: Vec<String>,
    ) -> Option<Candidate> {
        let id = id.trim();
        let images = dedupe_urls(images);
        if id.is_empty() || images.is_empty() {
            return None;
        }

        let author = sanitize_author(author);
        Some(Candidate {
            id: id.to_string(),
            source_url: source_url.to_string(),
            author_url: author_url_for(&author),
            author,
            text: truncate_text(text),
            images,
        })
    }

    pub fn into_record(self, saved_at: String) -> Record {
        Record {
            id: self.id,
            source_url: self.source_url,
            author: self.author,
            author_url: self.author_url,
            text: self.text,
            images: self.images,
            saved_at,
        }
    }
}

/// A saved post with its images.
///
/// Field names on disk match the export files of earlier releases
/// (`tweetId`, `tweetUrl`, `author`, ...); the descriptive names are
/// accepted as aliases when reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "tweetId", alias = "id")]
    pub id: String,
    #[serde(rename = "tweetUrl", alias = "sourceUrl")]
    pub source_url: String,
    #[serde(alias = "authorHandle")]
    pub author: String,
    #[serde(rename = "authorUrl")]
    pub author_url: String,
    pub text: String,
    pub images: Vec<String>,
    #[serde(rename = "savedAt")]
    pub saved_at: String,
}

impl Record {
    /// Repair a record read from outside the extractor (an import file).
    ///
    /// The id falls back to the key it was stored under, missing author
    /// fields are filled in and duplicate images dropped. A record left
    /// without images is rejected.
    pub fn sanitize(mut self, key: &str) -> Option<Record> {
        if self.id.trim().is_empty() {
            self.id = key.to_string();
        }
        self.author = sanitize_author(&self.author);
        if self.author_url.trim().is_empty() {
            self.author_url = author_url_for(&self.author);
        }
        self.text = truncate_text(&self.text);
        self.images = dedupe_urls(self.images.into_iter().filter(|url| !url.trim().is_empty()));

        if self.images.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Upper-cased first character of the author, for the avatar bubble
    pub fn author_initial(&self) -> String {
        self.author
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    pub fn saved_at_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.saved_at)
    }
}

pub fn author_url_for(author: &str) -> String {
    format!("https://twitter.com/{}", author)
}

fn sanitize_author(author: &str) -> String {
    let author = author.trim().trim_start_matches('@');
    if author.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        author.to_string()
    }
}

/// Keep at most `TEXT_LIMIT` characters of the post body
pub fn truncate_text(text: &str) -> String {
    text.chars().take(TEXT_LIMIT).collect()
}

/// Current time in the same shape browsers produce for `toISOString()`
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a `savedAt` value.
///
/// Accepts RFC 3339, a naive date-time (read as UTC) and a bare date
/// (midnight UTC), which covers everything earlier exports contain.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Human readable save date, e.g. "Jan 5, 2024"
pub fn format_saved_date(value: &str) -> String {
    match parse_timestamp(value) {
        Some(time) => time.format("%b %-d, %Y").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_candidate_creation() {
        let candidate = Candidate::new(
            "1234",
            "https://x.com/rustlang/status/1234",
            "rustlang",
            "Hello",
            images(&["https://pbs.twimg.com/media/A?format=jpg&name=large"]),
        )
        .unwrap();

        assert_eq!(candidate.id, "1234");
        assert_eq!(candidate.author, "rustlang");
        assert_eq!(candidate.author_url, "https://twitter.com/rustlang");
        assert_eq!(candidate.images.len(), 1);
    }

    #[test]
    fn test_candidate_rejects_missing_images_or_id() {
        assert!(Candidate::new("1", "", "a", "", vec![]).is_none());
        assert!(Candidate::new("  ", "", "a", "", images(&["x"])).is_none());
    }

    #[test]
    fn test_candidate_sanitizes_author_and_text() {
        let long_text = "é".repeat(TEXT_LIMIT + 50);
        let candidate = Candidate::new("1", "", "", &long_text, images(&["a", "a", "b"])).unwrap();

        assert_eq!(candidate.author, UNKNOWN_AUTHOR);
        assert_eq!(candidate.author_url, "https://twitter.com/unknown");
        assert_eq!(candidate.text.chars().count(), TEXT_LIMIT);
        assert_eq!(candidate.images, images(&["a", "b"]));
    }

    #[test]
    fn test_serialization_uses_export_field_names() {
        let record = Candidate::new("42", "https://x.com/a/status/42", "a", "t", images(&["i"]))
            .unwrap()
            .into_record("2024-01-05T10:00:00.000Z".to_string());

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["tweetId"], "42");
        assert_eq!(json["tweetUrl"], "https://x.com/a/status/42");
        assert_eq!(json["author"], "a");
        assert_eq!(json["authorUrl"], "https://twitter.com/a");
        assert_eq!(json["savedAt"], "2024-01-05T10:00:00.000Z");
    }

    #[test]
    fn test_deserialize_aliases_and_missing_fields() {
        let record: Record =
            serde_json::from_str(r#"{"id":"1","images":["a"],"author":"x","savedAt":"2020-01-01"}"#)
                .unwrap();

        assert_eq!(record.id, "1");
        assert_eq!(record.author, "x");
        assert_eq!(record.source_url, "");
        assert_eq!(record.text, "");
    }

    #[test]
    fn test_sanitize_fills_gaps() {
        let record = Record {
            images: images(&["a", "", "a"]),
            ..Record::default()
        };

        let record = record.sanitize("99").unwrap();

        assert_eq!(record.id, "99");
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert_eq!(record.author_url, "https://twitter.com/unknown");
        assert_eq!(record.images, images(&["a"]));
    }

    #[test]
    fn test_sanitize_rejects_empty_images() {
        let record = Record {
            id: "1".to_string(),
            images: vec![String::new()],
            ..Record::default()
        };

        assert!(record.sanitize("1").is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let full = parse_timestamp("2024-01-05T10:00:00.000Z").unwrap();
        let naive = parse_timestamp("2024-01-05T10:00:00").unwrap();
        let date = parse_timestamp("2024-01-05").unwrap();

        assert_eq!(full, naive);
        assert!(date < full);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_format_saved_date() {
        assert_eq!(format_saved_date("2024-01-05T10:00:00.000Z"), "Jan 5, 2024");
        assert_eq!(format_saved_date("2020-11-30"), "Nov 30, 2020");
        assert_eq!(format_saved_date("garbage"), "garbage");
    }

    #[test]
    fn test_now_timestamp_round_trips() {
        assert!(parse_timestamp(&now_timestamp()).is_some());
    }

    #[test]
    fn test_author_initial() {
        let record = Record {
            author: "alice".to_string(),
            ..Record::default()
        };
        assert_eq!(record.author_initial(), "A");
        assert_eq!(Record::default().author_initial(), "");
    }
}
