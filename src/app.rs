//! App core for TabStash.
//!
//! Central struct wiring the store, gateway, and settings together, plus
//! the high-level flows (sync, save, export, import, open). Mutating flows
//! broadcast a `groupsUpdated` event so any listening context reloads the
//! whole mapping; gateway completions are forwarded onto the same event
//! stream as `saveFileComplete`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;

use crate::database::Database;
use crate::managers::group_restorer::{self, HostBrowser};
use crate::managers::group_store::{
    GroupStore, GroupStoreTrait, ImportOutcome, SkippedGroup, TabRemoval,
};
use crate::managers::snapshot_collector;
use crate::services::archive_codec;
use crate::services::persistence_gateway::{
    compact_timestamp, FsWriter, PersistenceGateway,
};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::{RestoreError, StoreError, WriteError};
use crate::types::group::{Group, GroupMap};
use crate::types::host::WindowSnapshot;
use crate::types::message::{Event, SaveResult};
use crate::types::write::{WriteCompletion, WriteConfig, WriteRequest, WriteTicket};

/// Result of a batch sync or save: partial success is the norm, so write
/// dispatch failures are collected per group rather than aborting.
#[derive(Debug)]
pub struct SyncReport {
    /// Keys inserted into the store by this pass.
    pub merged: Vec<String>,
    /// Groups the merge refused with a warning.
    pub skipped: Vec<SkippedGroup>,
    /// Writes accepted by the gateway; completions arrive as events.
    pub dispatched: Vec<WriteTicket>,
    /// Writes rejected synchronously, keyed by group title.
    pub write_errors: Vec<(String, WriteError)>,
}

/// Result of saving a single group.
#[derive(Debug)]
pub struct SaveReport {
    pub key: String,
    pub ticket: Option<WriteTicket>,
    pub write_error: Option<WriteError>,
}

/// Central application struct holding the store, gateway, and settings.
pub struct App {
    pub db: Arc<Database>,
    pub store: GroupStore,
    pub gateway: PersistenceGateway,
    pub settings_engine: SettingsEngine,
    events: mpsc::UnboundedSender<Event>,
}

impl App {
    /// Creates a new App over a database file. Must be called within a
    /// tokio runtime (the gateway and event forwarder spawn tasks).
    /// Returns the outbound event stream alongside the app.
    pub fn new(
        db_path: &str,
        settings_path: Option<String>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Event>), Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        Self::with_database(db, settings_path)
    }

    /// Creates a new App over an in-memory database (tests, demo).
    pub fn in_memory(
        settings_path: Option<String>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Event>), Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open_in_memory()?);
        Self::with_database(db, settings_path)
    }

    fn with_database(
        db: Arc<Database>,
        settings_path: Option<String>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Event>), Box<dyn std::error::Error>> {
        let store = GroupStore::new(db.clone());

        let (writer, write_events) = FsWriter::channel();
        let (gateway, completions) = PersistenceGateway::new(writer, write_events);

        let mut settings_engine = SettingsEngine::new(settings_path);
        let _ = settings_engine.load();

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self::pump_completions(completions, events_tx.clone());

        Ok((
            Self {
                db,
                store,
                gateway,
                settings_engine,
                events: events_tx,
            },
            events_rx,
        ))
    }

    /// Forwards gateway completions onto the app event stream, addressed
    /// by group title.
    fn pump_completions(
        mut completions: mpsc::UnboundedReceiver<WriteCompletion>,
        events: mpsc::UnboundedSender<Event>,
    ) {
        tokio::spawn(async move {
            while let Some(completion) = completions.recv().await {
                let result = match completion.result {
                    Ok(path) => SaveResult::success(path),
                    Err(err) => SaveResult::failure(&err),
                };
                let _ = events.send(Event::SaveFileComplete {
                    group_title: completion.group_title,
                    result,
                });
            }
        });
    }

    /// Per-request write configuration built from the current settings.
    /// Loaded fresh on every call; destination config is never cached in
    /// an ambient singleton.
    pub fn write_config(&self) -> WriteConfig {
        WriteConfig {
            save_directory: self.settings_engine.save_directory().map(PathBuf::from),
        }
    }

    fn broadcast_groups(&self, groups: &GroupMap) {
        let _ = self.events.send(Event::GroupsUpdated {
            groups: groups.clone(),
        });
    }

    fn dispatch_group_write(
        &self,
        group: &Group,
        config: &WriteConfig,
    ) -> Result<WriteTicket, WriteError> {
        let content = serde_json::to_vec_pretty(group)
            .map_err(|e| WriteError::Validation(e.to_string()))?;
        self.gateway
            .request_write(WriteRequest::group(&group.title, content), config)
    }

    /// Captures all windows, merges every real group into the store in one
    /// pass, then fans out one durable write per merged group. The store
    /// mutation completes before any write is issued.
    pub fn sync_windows(&self, windows: &[WindowSnapshot]) -> Result<SyncReport, StoreError> {
        let captured = snapshot_collector::collect(windows);
        let outcome = self.store.merge(&captured)?;
        self.broadcast_groups(&outcome.groups);

        let config = self.write_config();
        let mut dispatched = Vec::new();
        let mut write_errors = Vec::new();
        for key in &outcome.inserted {
            let group = &outcome.groups[key];
            match self.dispatch_group_write(group, &config) {
                Ok(ticket) => dispatched.push(ticket),
                Err(err) => write_errors.push((group.title.clone(), err)),
            }
        }

        Ok(SyncReport {
            merged: outcome.inserted,
            skipped: outcome.skipped,
            dispatched,
            write_errors,
        })
    }

    /// Saves one live group: validates, merges it into the store under a
    /// fresh key, then dispatches its durable write.
    pub fn save_group(&self, group: &Group) -> Result<SaveReport, StoreError> {
        if group.title.trim().is_empty() {
            return Err(StoreError::InvalidGroup("missing title".to_string()));
        }
        if group.tabs.is_empty() {
            return Err(StoreError::InvalidGroup(format!(
                "group '{}' has no tabs",
                group.title
            )));
        }

        let mut batch = GroupMap::new();
        batch.insert(group.title.clone(), group.clone());
        let outcome = self.store.merge(&batch)?;

        let key = match outcome.inserted.first() {
            Some(key) => key.clone(),
            None => {
                return Err(StoreError::InvalidGroup(format!(
                    "invalid group title after sanitization: '{}'",
                    group.title
                )))
            }
        };
        self.broadcast_groups(&outcome.groups);

        let saved = &outcome.groups[&key];
        let (ticket, write_error) =
            match self.dispatch_group_write(saved, &self.write_config()) {
                Ok(ticket) => (Some(ticket), None),
                Err(err) => (None, Some(err)),
            };

        Ok(SaveReport {
            key,
            ticket,
            write_error,
        })
    }

    /// Writes every saved group to its own JSON file via the gateway.
    pub fn export_groups(&self) -> Result<SyncReport, StoreError> {
        let entries = self.store.list_saved()?;
        let config = self.write_config();

        let mut dispatched = Vec::new();
        let mut write_errors = Vec::new();
        for (_, group) in &entries {
            match self.dispatch_group_write(group, &config) {
                Ok(ticket) => dispatched.push(ticket),
                Err(err) => write_errors.push((group.title.clone(), err)),
            }
        }

        Ok(SyncReport {
            merged: Vec::new(),
            skipped: Vec::new(),
            dispatched,
            write_errors,
        })
    }

    /// Bundles all saved groups into one timestamped ZIP archive and
    /// dispatches its durable write. Returns `None` when there is nothing
    /// to export.
    pub fn export_archive(&self) -> Result<Option<WriteTicket>, Box<dyn std::error::Error>> {
        let groups = self.store.get_all()?;
        if groups.is_empty() {
            return Ok(None);
        }

        let bytes = archive_codec::pack(&groups)?;
        let filename = format!("tab-groups-{}.zip", compact_timestamp(now_millis()));
        let ticket = self.gateway.request_write(
            WriteRequest::named("tab-groups", &filename, bytes),
            &self.write_config(),
        )?;
        Ok(Some(ticket))
    }

    /// Imports an archive or bare JSON file, stamping `savedAt` where
    /// absent, and unions it into the store with one atomic set.
    pub fn import_file(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ImportOutcome, Box<dyn std::error::Error>> {
        let groups = archive_codec::decode_import(filename, bytes, now_millis())?;
        let outcome = self.store.import(groups)?;
        self.broadcast_groups(&outcome.groups);
        Ok(outcome)
    }

    /// Opens a saved group into a new host window.
    pub fn open_group(
        &self,
        host: &mut dyn HostBrowser,
        key: &str,
    ) -> Result<i64, RestoreError> {
        let groups = self
            .store
            .get_all()
            .map_err(|e| RestoreError::Store(e.to_string()))?;
        let group = groups
            .get(key)
            .ok_or_else(|| RestoreError::NotFound(key.to_string()))?;
        group_restorer::open_group(host, group)
    }

    /// Deletes a saved group; absent keys are a quiet no-op (`false`).
    pub fn delete_group(&self, key: &str) -> Result<bool, StoreError> {
        let deleted = self.store.delete(key)?;
        if deleted {
            self.broadcast_groups(&self.store.get_all()?);
        }
        Ok(deleted)
    }

    /// Renames a saved group.
    pub fn rename_group(&self, key: &str, new_title: &str) -> Result<(), StoreError> {
        self.store.rename(key, new_title)?;
        self.broadcast_groups(&self.store.get_all()?);
        Ok(())
    }

    /// Removes one tab from a saved group, deleting the group when its
    /// last tab goes.
    pub fn remove_saved_tab(&self, key: &str, index: usize) -> Result<TabRemoval, StoreError> {
        let removal = self.store.remove_tab(key, index)?;
        self.broadcast_groups(&self.store.get_all()?);
        Ok(removal)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
