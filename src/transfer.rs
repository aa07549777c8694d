/// Export and import of the saved collection as JSON files
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{ImportError, StoreError};
use crate::merge::{MergeMode, MergeOutcome, merge};
use crate::record::{Bookmarks, Record};
use crate::storage::BookmarkStore;

/// `twitter-bookmarks-<YYYY-MM-DD>.json`
pub fn export_filename(date: NaiveDate) -> String {
    format!("twitter-bookmarks-{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON, same shape as the persisted collection
pub fn export_json(bookmarks: &Bookmarks) -> Result<String, StoreError> {
    serde_json::to_string_pretty(bookmarks).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Records read from an import file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub records: Vec<Record>,
    /// Entries dropped because they had no images
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub merge: MergeOutcome,
    pub skipped: usize,
}

impl ImportOutcome {
    pub fn new_count(&self) -> usize {
        self.merge.new_count
    }

    pub fn updated_count(&self) -> usize {
        self.merge.collision_count
    }

    pub fn summary(&self) -> String {
        let mut message = format!(
            "Import successful!\n✅ {} new tweets\n🔄 {} updated",
            self.new_count(),
            self.updated_count()
        );
        if self.skipped > 0 {
            message.push_str(&format!("\n⚠️ {} skipped (no images)", self.skipped));
        }
        message
    }
}

/// Validate an import payload without touching any store
pub fn parse_import(payload: &str) -> Result<ImportBatch, ImportError> {
    let Value::Object(entries) = serde_json::from_str::<Value>(payload)? else {
        return Err(ImportError::NotAnObject);
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for (key, value) in entries {
        if !value.is_object() {
            return Err(ImportError::InvalidRecord {
                key,
                message: "expected an object".to_string(),
            });
        }

        let record: Record = serde_json::from_value(value).map_err(|e| ImportError::InvalidRecord {
            key: key.clone(),
            message: e.to_string(),
        })?;

        // The payload key is the record's identity, whatever `tweetId` says
        match record.sanitize(&key) {
            Some(mut record) => {
                record.id = key;
                records.push(record);
            }
            None => {
                log::warn!("Skipping imported bookmark {} without images", key);
                skipped += 1;
            }
        }
    }

    Ok(ImportBatch { records, skipped })
}

/// Merge an import payload into `existing`
pub fn import_into(existing: Bookmarks, payload: &str) -> Result<ImportOutcome, ImportError> {
    let batch = parse_import(payload)?;
    Ok(ImportOutcome {
        merge: merge(existing, batch.records, MergeMode::Import),
        skipped: batch.skipped,
    })
}

/// Import a payload into `store`. Nothing is written unless the whole
/// payload validates.
pub fn import_into_store(store: &impl BookmarkStore, payload: &str) -> Result<ImportOutcome, ImportError> {
    let outcome = import_into(store.load()?, payload)?;
    store.save(&outcome.merge.bookmarks)?;

    log::info!(
        "Imported bookmarks: {} new, {} updated, {} skipped",
        outcome.new_count(),
        outcome.updated_count(),
        outcome.skipped
    );
    Ok(outcome)
}
