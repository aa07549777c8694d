/// Persistence for saved bookmarks and page preferences
use std::cell::RefCell;
use std::collections::HashMap;

use web_sys::Storage;

use crate::error::StoreError;
use crate::record::Bookmarks;

/// Key holding the JSON object of every saved bookmark
pub const BOOKMARKS_KEY: &str = "twitterBookmarks";
pub const THEME_KEY: &str = "twitterBookmarksTheme";
pub const GRID_SIZE_KEY: &str = "twitterBookmarksGridSize";

pub const DEFAULT_GRID_SIZE: u32 = 280;
pub const MIN_GRID_SIZE: u32 = 150;
pub const MAX_GRID_SIZE: u32 = 500;

/// Durable id-keyed collection of records
pub trait BookmarkStore {
    /// Current contents. An empty or never-written store loads as empty.
    fn load(&self) -> Result<Bookmarks, StoreError>;

    /// Replace the whole collection
    fn save(&self, bookmarks: &Bookmarks) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// String slots addressed by key, the shape of `window.localStorage`
pub trait KeyValue {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// The page's `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage(&self) -> Result<Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl KeyValue for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Read(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }
}

/// In-process slots, for tests and scratch stores
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, exactly as written
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValue for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Bookmarks kept as one JSON object under a single key.
///
/// Every save writes the whole object in one `set_item`, so a later load
/// sees either the previous or the new collection, never a mix.
#[derive(Debug, Default)]
pub struct KeyValueStore<K> {
    backend: K,
}

impl<K: KeyValue> KeyValueStore<K> {
    pub fn new(backend: K) -> Self {
        KeyValueStore { backend }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }
}

impl<K: KeyValue> BookmarkStore for KeyValueStore<K> {
    fn load(&self) -> Result<Bookmarks, StoreError> {
        Ok(self
            .backend
            .get_item(BOOKMARKS_KEY)?
            .map(|raw| decode_bookmarks(&raw))
            .unwrap_or_default())
    }

    fn save(&self, bookmarks: &Bookmarks) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(bookmarks).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.backend.set_item(BOOKMARKS_KEY, &json)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove_item(BOOKMARKS_KEY)
    }
}

/// Store backed by `window.localStorage`, shared by the popup and gallery page
pub fn local_store() -> KeyValueStore<LocalStorage> {
    KeyValueStore::new(LocalStorage)
}

/// Read a persisted payload; a corrupt payload reads as an empty collection
fn decode_bookmarks(raw: &str) -> Bookmarks {
    if raw.trim().is_empty() {
        return Bookmarks::new();
    }
    match serde_json::from_str(raw) {
        Ok(bookmarks) => bookmarks,
        Err(e) => {
            log::warn!("Stored bookmarks are corrupt, starting empty: {}", e);
            Bookmarks::new()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Look-and-feel settings of the gallery page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub grid_size: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            theme: Theme::Dark,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl Preferences {
    /// Stored preferences, falling back to defaults for anything unreadable
    pub fn load(backend: &impl KeyValue) -> Preferences {
        let defaults = Preferences::default();

        let theme = match backend.get_item(THEME_KEY) {
            Ok(Some(value)) if value == Theme::Light.as_str() => Theme::Light,
            Ok(_) => Theme::Dark,
            Err(e) => {
                log::warn!("Could not read theme: {}", e);
                defaults.theme
            }
        };

        let grid_size = match backend.get_item(GRID_SIZE_KEY) {
            Ok(Some(value)) => value
                .trim()
                .parse::<u32>()
                .map(clamp_grid_size)
                .unwrap_or(defaults.grid_size),
            Ok(None) => defaults.grid_size,
            Err(e) => {
                log::warn!("Could not read grid size: {}", e);
                defaults.grid_size
            }
        };

        Preferences { theme, grid_size }
    }

    pub fn save_theme(backend: &impl KeyValue, theme: Theme) -> Result<(), StoreError> {
        backend.set_item(THEME_KEY, theme.as_str())
    }

    pub fn save_grid_size(backend: &impl KeyValue, size: u32) -> Result<(), StoreError> {
        backend.set_item(GRID_SIZE_KEY, &clamp_grid_size(size).to_string())
    }
}

pub fn clamp_grid_size(size: u32) -> u32 {
    size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE)
}
