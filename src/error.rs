/// Error types for Bookmark Hoarder
use thiserror::Error;

/// Failure of the persistence backend itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Storage is not available: {0}")]
    Unavailable(String),

    #[error("Failed to read storage: {0}")]
    Read(String),

    #[error("Failed to write storage: {0}")]
    Write(String),

    #[error("Failed to serialize bookmarks: {0}")]
    Serialize(String),
}

/// Why an import file was rejected. The store is untouched in every case.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid data format: expected an object of bookmarks keyed by id")]
    NotAnObject,

    #[error("Invalid bookmark \"{key}\": {message}")]
    InvalidRecord { key: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure while reading the bookmarks page
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("DOM query failed: {0}")]
    Dom(String),

    #[error("Invalid page address: {0}")]
    PageUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_messages() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        assert!(ImportError::Parse(parse).to_string().starts_with("Invalid JSON:"));
        assert_eq!(
            ImportError::InvalidRecord {
                key: "7".to_string(),
                message: "expected an object".to_string()
            }
            .to_string(),
            "Invalid bookmark \"7\": expected an object"
        );
        assert_eq!(
            ImportError::from(StoreError::Write("quota".to_string())).to_string(),
            "Failed to write storage: quota"
        );
    }
}
