use crate::migrate::migrate_favorites;
use crate::store::{Store, StoreError, FAVORITES_KEY, HISTORY_KEY};
use crate::types::{HistoryItem, Prescription};

/// Maximum number of history entries kept
pub const HISTORY_LIMIT: usize = 15;

/// Prompt shown before the history is wiped
pub const CLEAR_HISTORY_PROMPT: &str = "Clear all search history?";

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Confirmer that approves everything (for `--force`)
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Favorites and search history, kept in memory and mirrored to a [`Store`].
///
/// The in-memory collections are authoritative: a failed write is reported
/// to the caller but never rolls the collection back.
pub struct Library {
    store: Box<dyn Store>,
    favorites: Vec<Prescription>,
    history: Vec<HistoryItem>,
}

impl Library {
    /// Load both collections from `store`
    pub fn open(store: Box<dyn Store>) -> Self {
        let mut library = Self {
            store,
            favorites: Vec::new(),
            history: Vec::new(),
        };
        library.favorites = library.load_favorites();
        library.history = library.load_history();
        library
    }

    pub fn favorites(&self) -> &[Prescription] {
        &self.favorites
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Read favorites from the store, upgrading legacy entries.
    ///
    /// Any failure yields an empty collection.
    pub fn load_favorites(&self) -> Vec<Prescription> {
        let raw = match self.store.load(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load favorites");
                return Vec::new();
            }
        };

        match migrate_favorites(&raw) {
            Ok((favorites, report)) => {
                if report.migrated > 0 {
                    tracing::info!(count = report.migrated, "Migrated legacy favorites");
                }
                if report.skipped > 0 {
                    tracing::warn!(count = report.skipped, "Dropped unreadable favorites");
                }
                favorites
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites");
                Vec::new()
            }
        }
    }

    /// Replace the favorites collection and write it through
    pub fn save_favorites(&mut self, items: Vec<Prescription>) -> Result<(), StoreError> {
        self.favorites = items;
        self.persist_favorites()
    }

    pub fn is_favorite(&self, item: &Prescription) -> bool {
        self.favorites.iter().any(|fav| fav.same_identity(item))
    }

    /// Remove `item` if a favorite with its name exists, otherwise add it first.
    ///
    /// Returns whether `item` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, item: &Prescription) -> Result<bool, StoreError> {
        let now_favorite = !self.is_favorite(item);

        let updated = if now_favorite {
            let mut updated = Vec::with_capacity(self.favorites.len() + 1);
            updated.push(item.clone());
            updated.extend(self.favorites.iter().cloned());
            updated
        } else {
            self.favorites
                .iter()
                .filter(|fav| !fav.same_identity(item))
                .cloned()
                .collect()
        };

        self.save_favorites(updated)?;
        Ok(now_favorite)
    }

    fn persist_favorites(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.favorites)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        self.store.save(FAVORITES_KEY, &json)
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Read history from the store; any failure yields an empty collection
    pub fn load_history(&self) -> Vec<HistoryItem> {
        let raw = match self.store.load(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load search history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryItem>>(&raw) {
            Ok(mut history) => {
                history.truncate(HISTORY_LIMIT);
                history
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read search history");
                Vec::new()
            }
        }
    }

    /// Record a query as the newest history entry
    pub fn add_history_entry(&mut self, query: &str) -> Result<(), StoreError> {
        self.add_history_entry_at(query, chrono::Utc::now().timestamp_millis())
    }

    /// Record a query with an explicit epoch-millis timestamp.
    ///
    /// An existing entry with the same trimmed query is moved to the front
    /// rather than duplicated.
    pub fn add_history_entry_at(&mut self, query: &str, timestamp: i64) -> Result<(), StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        self.history.retain(|item| item.query != query);
        self.history.insert(
            0,
            HistoryItem {
                query: query.to_string(),
                timestamp,
            },
        );
        self.history.truncate(HISTORY_LIMIT);

        let json = serde_json::to_string(&self.history)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        self.store.save(HISTORY_KEY, &json)
    }

    /// Empty the history after the user approves.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub fn clear_history(&mut self, confirm: &dyn Confirm) -> Result<bool, StoreError> {
        if !confirm.confirm(CLEAR_HISTORY_PROMPT) {
            return Ok(false);
        }

        self.history.clear();
        self.store.remove(HISTORY_KEY)?;
        tracing::info!("Search history cleared");
        Ok(true)
    }
}
