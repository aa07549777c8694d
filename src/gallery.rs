/// Filtering, sorting and grid layout of saved bookmarks
use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};

use crate::record::{Bookmarks, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Author,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Newest, SortKey::Oldest, SortKey::Author];

    /// Value used by the sort `<select>`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Author => "author",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest first",
            SortKey::Oldest => "Oldest first",
            SortKey::Author => "By author",
        }
    }

    pub fn from_value(value: &str) -> Option<SortKey> {
        SortKey::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

/// Case-insensitive substring match on author or text
pub fn matches_query(record: &Record, query: &str) -> bool {
    let query = query.to_lowercase();
    record.author.to_lowercase().contains(&query) || record.text.to_lowercase().contains(&query)
}

/// Records matching `query`, in their current order
pub fn filter_records(records: &[Record], query: &str) -> Vec<Record> {
    if query.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| matches_query(record, query))
        .cloned()
        .collect()
}

/// Stable sort by `key`. Unparseable timestamps count as the oldest.
pub fn sort_records(mut records: Vec<Record>, key: SortKey) -> Vec<Record> {
    match key {
        SortKey::Newest => records.sort_by(|a, b| b.saved_at_time().cmp(&a.saved_at_time())),
        SortKey::Oldest => records.sort_by(|a, b| a.saved_at_time().cmp(&b.saved_at_time())),
        SortKey::Author => {
            let collator = author_collator();
            records.sort_by(|a, b| collate(collator.as_ref(), &a.author, &b.author));
        }
    }
    records
}

/// Root-locale collator, the order `localeCompare` gives in the browser
fn author_collator() -> Option<Collator> {
    Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| log::warn!("Author collation unavailable: {:?}", e))
        .ok()
}

/// Collation order for author handles. Accents and case only break ties,
/// punctuation sorts before digits and digits before letters, and lower
/// case comes before upper case.
pub fn compare_authors(a: &str, b: &str) -> Ordering {
    collate(author_collator().as_ref(), a, b)
}

fn collate(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| b.cmp(a)),
    }
}

/// One tile of a rendered grid
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCell {
    pub record: Record,
    pub image_url: String,
    /// Position of `image_url` within the record's images
    pub position: usize,
    /// Images of the record not shown by this tile
    pub hidden_images: usize,
}

/// One tile per record, showing its first image (gallery page)
pub fn record_cells(records: &[Record]) -> Vec<GalleryCell> {
    records
        .iter()
        .filter_map(|record| {
            record.images.first().map(|first| GalleryCell {
                record: record.clone(),
                image_url: first.clone(),
                position: 0,
                hidden_images: record.images.len() - 1,
            })
        })
        .collect()
}

/// One tile per image of every record (popup, and a single record's
/// "view all images")
pub fn image_cells(records: &[Record]) -> Vec<GalleryCell> {
    records
        .iter()
        .flat_map(|record| {
            record.images.iter().enumerate().map(|(position, url)| GalleryCell {
                record: record.clone(),
                image_url: url.clone(),
                position,
                hidden_images: 0,
            })
        })
        .collect()
}

pub fn total_images(records: &[Record]) -> usize {
    records.iter().map(|record| record.images.len()).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryStats {
    pub tweets: usize,
    pub images: usize,
    /// Set when a filter hides part of the collection
    pub showing: Option<usize>,
}

/// Everything the gallery page knows about what it is showing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GalleryState {
    records: Vec<Record>,
    query: String,
    sort: SortKey,
}

impl GalleryState {
    pub fn new(bookmarks: &Bookmarks, sort: SortKey) -> Self {
        GalleryState {
            records: bookmarks.values().cloned().collect(),
            query: String::new(),
            sort,
        }
    }

    /// Swap in a reloaded collection, keeping query and sort
    pub fn replace_records(&mut self, bookmarks: &Bookmarks) {
        self.records = bookmarks.values().cloned().collect();
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Filtered then sorted records
    pub fn visible(&self) -> Vec<Record> {
        sort_records(filter_records(&self.records, &self.query), self.sort)
    }

    pub fn stats(&self) -> GalleryStats {
        let visible = filter_records(&self.records, &self.query).len();
        GalleryStats {
            tweets: self.records.len(),
            images: total_images(&self.records),
            showing: (visible != self.records.len()).then_some(visible),
        }
    }
}
