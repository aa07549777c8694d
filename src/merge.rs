/// Reconciling incoming bookmarks with the saved collection
use crate::error::StoreError;
use crate::record::{Bookmarks, Candidate, Record};
use crate::storage::BookmarkStore;

/// Collision policy applied to ids that are already saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Live scrape: known ids take the fresh fields but keep their `savedAt`
    Extraction,
    /// File import: known ids are replaced wholesale
    Import,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub bookmarks: Bookmarks,
    pub new_count: usize,
    /// Ids that were already saved ("already saved" for extraction,
    /// "updated" for import)
    pub collision_count: usize,
}

impl MergeOutcome {
    pub fn extraction_summary(&self, found: usize) -> String {
        format!(
            "Found {} tweets: ✅ {} new | ⏭️ {} already saved",
            found, self.new_count, self.collision_count
        )
    }
}

/// Merge `incoming` into `existing`.
///
/// In extraction mode the `saved_at` carried by an incoming record is only
/// used when its id is new.
pub fn merge<I>(mut existing: Bookmarks, incoming: I, mode: MergeMode) -> MergeOutcome
where
    I: IntoIterator<Item = Record>,
{
    let mut new_count = 0;
    let mut collision_count = 0;

    for mut record in incoming {
        match existing.get(&record.id) {
            Some(previous) => {
                collision_count += 1;
                if mode == MergeMode::Extraction {
                    record.saved_at = previous.saved_at.clone();
                }
            }
            None => new_count += 1,
        }
        existing.insert(record.id.clone(), record);
    }

    MergeOutcome {
        bookmarks: existing,
        new_count,
        collision_count,
    }
}

/// Merge a freshly scraped batch, stamping new ids with `saved_at`
pub fn merge_extracted(existing: Bookmarks, candidates: Vec<Candidate>, saved_at: &str) -> MergeOutcome {
    let records = candidates
        .into_iter()
        .map(|candidate| candidate.into_record(saved_at.to_string()));
    merge(existing, records, MergeMode::Extraction)
}

/// Load, merge a scraped batch and save it back
pub fn save_extraction(
    store: &impl BookmarkStore,
    candidates: Vec<Candidate>,
    saved_at: &str,
) -> Result<MergeOutcome, StoreError> {
    let found = candidates.len();
    let outcome = merge_extracted(store.load()?, candidates, saved_at);
    store.save(&outcome.bookmarks)?;

    log::info!(
        "Saved extraction of {} posts: {} new, {} already saved",
        found,
        outcome.new_count,
        outcome.collision_count
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStorage};

    fn create_test_candidate(id: &str, text: &str) -> Candidate {
        Candidate::new(
            id,
            &format!("https://x.com/ferris/status/{}", id),
            "ferris",
            text,
            vec![format!("https://pbs.twimg.com/media/{}?format=jpg&name=large", id)],
        )
        .unwrap()
    }

    fn create_test_record(id: &str, saved_at: &str) -> Record {
        create_test_candidate(id, "old text").into_record(saved_at.to_string())
    }

    #[test]
    fn test_merge_into_empty() {
        let outcome = merge_extracted(
            Bookmarks::new(),
            vec![create_test_candidate("1", "a"), create_test_candidate("2", "b")],
            "2024-01-05T10:00:00.000Z",
        );

        assert_eq!(outcome.new_count, 2);
        assert_eq!(outcome.collision_count, 0);
        assert_eq!(outcome.bookmarks["1"].saved_at, "2024-01-05T10:00:00.000Z");
    }

    #[test]
    fn test_extraction_keeps_saved_at_and_refreshes_fields() {
        let mut existing = Bookmarks::new();
        existing.insert("1".to_string(), create_test_record("1", "2020-01-01"));

        let outcome = merge_extracted(
            existing,
            vec![create_test_candidate("1", "new text")],
            "2024-01-05T10:00:00.000Z",
        );

        let record = &outcome.bookmarks["1"];
        assert_eq!(record.saved_at, "2020-01-01");
        assert_eq!(record.text, "new text");
        assert_eq!(outcome.new_count, 0);
        assert_eq!(outcome.collision_count, 1);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let batch = vec![create_test_candidate("1", "a"), create_test_candidate("2", "b")];

        let first = merge_extracted(Bookmarks::new(), batch.clone(), "2024-01-05T10:00:00.000Z");
        let second = merge_extracted(first.bookmarks.clone(), batch, "2024-02-01T00:00:00.000Z");

        assert_eq!(second.new_count, 0);
        assert_eq!(second.collision_count, 2);
        assert_eq!(second.bookmarks.len(), first.bookmarks.len());
        assert_eq!(second.bookmarks, first.bookmarks);
    }

    #[test]
    fn test_import_replaces_saved_at() {
        let mut existing = Bookmarks::new();
        existing.insert("1".to_string(), create_test_record("1", "2020-01-01"));

        let outcome = merge(
            existing,
            vec![create_test_record("1", "2023-06-30"), create_test_record("2", "2023-07-01")],
            MergeMode::Import,
        );

        assert_eq!(outcome.bookmarks["1"].saved_at, "2023-06-30");
        assert_eq!(outcome.new_count, 1);
        assert_eq!(outcome.collision_count, 1);
    }

    #[test]
    fn test_extraction_summary() {
        let outcome = MergeOutcome {
            bookmarks: Bookmarks::new(),
            new_count: 3,
            collision_count: 2,
        };

        assert_eq!(
            outcome.extraction_summary(5),
            "Found 5 tweets: ✅ 3 new | ⏭️ 2 already saved"
        );
    }

    #[test]
    fn test_save_extraction_persists() {
        let store = KeyValueStore::new(MemoryStorage::new());

        let first = save_extraction(&store, vec![create_test_candidate("1", "a")], "2020-01-01").unwrap();
        let second = save_extraction(&store, vec![create_test_candidate("1", "b")], "2024-01-01").unwrap();

        assert_eq!(first.new_count, 1);
        assert_eq!(second.new_count, 0);

        let saved = store.load().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved["1"].saved_at, "2020-01-01");
        assert_eq!(saved["1"].text, "b");
    }
}
