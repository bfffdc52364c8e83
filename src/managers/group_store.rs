//! Durable store for saved tab groups.
//!
//! Owns the persisted mapping under the `savedGroups` storage key and is
//! the single source of truth read by the UI layer. Every mutation is a
//! whole-mapping read-modify-write: one get of the full document, one set
//! of the full document, serialized against other mutating calls by an
//! internal lock, because the underlying storage offers no compare-and-swap.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::database::Database;
use crate::services::name_sanitizer;
use crate::types::errors::StoreError;
use crate::types::group::{Group, GroupMap};

/// Storage key holding the whole saved-group mapping.
pub const SAVED_GROUPS_KEY: &str = "savedGroups";

/// Trait defining the saved-group store interface.
pub trait GroupStoreTrait {
    fn get_all(&self) -> Result<GroupMap, StoreError>;
    fn list_saved(&self) -> Result<Vec<(String, Group)>, StoreError>;
    fn merge(&self, new_groups: &GroupMap) -> Result<MergeOutcome, StoreError>;
    fn import(&self, groups: GroupMap) -> Result<ImportOutcome, StoreError>;
    fn delete(&self, key: &str) -> Result<bool, StoreError>;
    fn rename(&self, key: &str, new_title: &str) -> Result<(), StoreError>;
    fn remove_tab(&self, key: &str, index: usize) -> Result<TabRemoval, StoreError>;
}

/// Result of a merge: the full merged mapping, the keys inserted by this
/// call, and the entries skipped with a warning.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub groups: GroupMap,
    pub inserted: Vec<String>,
    pub skipped: Vec<SkippedGroup>,
}

/// One group a merge refused to persist. A soft warning, never a hard
/// failure: the rest of the batch still goes through.
#[derive(Debug, Clone)]
pub struct SkippedGroup {
    pub key: String,
    pub title: String,
    pub reason: String,
}

/// Result of an import: the full mapping and how many entries came in.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub groups: GroupMap,
    pub imported: usize,
}

/// What `remove_tab` did to the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRemoval {
    /// The tab was removed; the group keeps its remaining tabs.
    Removed { remaining: usize },
    /// Removing the last tab deleted the whole group entry; an empty
    /// group is never kept.
    GroupDeleted,
}

/// Saved-group store backed by the key-value database.
pub struct GroupStore {
    db: Arc<Database>,
    /// Serializes read-modify-write cycles and carries the last issued key
    /// timestamp so keys stay strictly monotonic across calls.
    state: Mutex<i64>,
}

impl GroupStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            state: Mutex::new(0),
        }
    }

    fn load(&self) -> Result<GroupMap, StoreError> {
        match self
            .db
            .kv_get(SAVED_GROUPS_KEY)
            .map_err(|e| StoreError::Storage(e.to_string()))?
        {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| StoreError::Serialization(e.to_string()))
            }
            None => Ok(GroupMap::new()),
        }
    }

    fn store(&self, groups: &GroupMap) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(groups).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.db
            .kv_set(SAVED_GROUPS_KEY, &json)
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    /// Next key timestamp: wall-clock millis, bumped past the last issued
    /// value so two saves in the same millisecond never collide.
    fn next_key_millis(last: &mut i64) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;
        *last = now.max(*last + 1);
        *last
    }
}

impl GroupStoreTrait for GroupStore {
    /// Returns the current persisted mapping, or an empty mapping if none
    /// exists yet.
    fn get_all(&self) -> Result<GroupMap, StoreError> {
        self.load()
    }

    /// Returns saved groups newest-first by `savedAt` (entries without a
    /// timestamp sort last).
    fn list_saved(&self) -> Result<Vec<(String, Group)>, StoreError> {
        let mut entries: Vec<(String, Group)> = self.load()?.into_iter().collect();
        entries.sort_by_key(|(_, g)| std::cmp::Reverse(g.saved_at.unwrap_or(i64::MIN)));
        Ok(entries)
    }

    /// Merges newly captured groups into the store.
    ///
    /// Each entry gets a fresh `sanitize(title)_<millis>` key and a
    /// `savedAt` stamp: saved history is additive, existing entries are
    /// never overwritten in place. Synthetic ungrouped entries are never
    /// persisted. Entries whose sanitized title is empty, or whose tab list
    /// is empty, are skipped with a warning rather than aborting the merge.
    fn merge(&self, new_groups: &GroupMap) -> Result<MergeOutcome, StoreError> {
        let mut last = self
            .state
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".to_string()))?;

        let mut merged = self.load()?;
        let mut inserted = Vec::new();
        let mut skipped = Vec::new();

        for (key, group) in new_groups {
            if group.ungrouped {
                continue;
            }
            if group.tabs.is_empty() {
                warn!(key = %key, title = %group.title, "skipping group with no tabs");
                skipped.push(SkippedGroup {
                    key: key.clone(),
                    title: group.title.clone(),
                    reason: "empty tab list".to_string(),
                });
                continue;
            }
            let sanitized = name_sanitizer::sanitize(&group.title);
            if sanitized.is_empty() {
                warn!(key = %key, title = %group.title, "skipping group with unsanitizable title");
                skipped.push(SkippedGroup {
                    key: key.clone(),
                    title: group.title.clone(),
                    reason: "title empty after sanitization".to_string(),
                });
                continue;
            }

            let millis = Self::next_key_millis(&mut last);
            let new_key = format!("{}_{}", sanitized, millis);
            merged.insert(
                new_key.clone(),
                Group::saved(&sanitized, group.tabs.clone(), millis),
            );
            inserted.push(new_key);
        }

        self.store(&merged)?;
        Ok(MergeOutcome {
            groups: merged,
            inserted,
            skipped,
        })
    }

    /// Unions already-keyed groups (an import) into the store with one
    /// atomic set. Unlike `merge`, keys are preserved as-is; entries with
    /// no tabs are skipped with a warning.
    fn import(&self, groups: GroupMap) -> Result<ImportOutcome, StoreError> {
        let _guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".to_string()))?;

        let mut merged = self.load()?;
        let mut imported = 0;
        for (key, group) in groups {
            if group.tabs.is_empty() {
                warn!(key = %key, "skipping imported group with no tabs");
                continue;
            }
            merged.insert(key, group);
            imported += 1;
        }

        self.store(&merged)?;
        Ok(ImportOutcome {
            groups: merged,
            imported,
        })
    }

    /// Removes one entry; returns `false` without error if the key is
    /// absent.
    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let _guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".to_string()))?;

        let mut groups = self.load()?;
        if groups.remove(key).is_none() {
            return Ok(false);
        }
        self.store(&groups)?;
        Ok(true)
    }

    /// Replaces only the `title` field of one entry, leaving tabs and
    /// `savedAt` untouched, and persists the whole mapping.
    fn rename(&self, key: &str, new_title: &str) -> Result<(), StoreError> {
        let _guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".to_string()))?;

        let mut groups = self.load()?;
        let group = groups
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        group.title = new_title.to_string();
        self.store(&groups)
    }

    /// Removes one tab by position. A group whose tabs drop to zero is
    /// deleted, never kept empty.
    fn remove_tab(&self, key: &str, index: usize) -> Result<TabRemoval, StoreError> {
        let _guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".to_string()))?;

        let mut groups = self.load()?;
        let group = groups
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if index >= group.tabs.len() {
            return Err(StoreError::TabIndexOutOfRange {
                key: key.to_string(),
                index,
            });
        }

        group.tabs.remove(index);
        let removal = if group.tabs.is_empty() {
            groups.remove(key);
            TabRemoval::GroupDeleted
        } else {
            TabRemoval::Removed {
                remaining: group.tabs.len(),
            }
        };
        self.store(&groups)?;
        Ok(removal)
    }
}
