//! TabStash — snapshot, persist, and restore browser tab groups.
//!
//! Entry point: runs an interactive console demo that walks every
//! component. The real integration surface is the `tabstash-bridge`
//! binary speaking the NDJSON message protocol.

use std::sync::Arc;

use tabstash::database::Database;
use tabstash::managers::group_restorer::{self, HostBrowser};
use tabstash::managers::group_store::{GroupStore, GroupStoreTrait, TabRemoval};
use tabstash::managers::snapshot_collector;
use tabstash::services::archive_codec;
use tabstash::services::name_sanitizer;
use tabstash::services::persistence_gateway::{FsWriter, PersistenceGateway};
use tabstash::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabstash::types::errors::RestoreError;
use tabstash::types::group::{Group, GroupMap};
use tabstash::types::host::{GroupHandle, TabCapture, WindowSnapshot};
use tabstash::types::message::Event;
use tabstash::types::tab::Tab;
use tabstash::types::write::{WriteConfig, WriteRequest};

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 TabStash v{} — Demo Mode                  ║", env!("CARGO_PKG_VERSION"));
    println!("║        Snapshot, persist, and restore browser tab groups     ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_database();
    demo_settings();
    demo_sanitizer();
    demo_collector();
    demo_store();
    demo_archive();
    demo_gateway().await;
    demo_restore();
    demo_app().await;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated successfully!");
    println!("═══════════════════════════════════════════════════════════════");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn sample_windows() -> Vec<WindowSnapshot> {
    vec![WindowSnapshot {
        id: 1,
        tabs: vec![
            TabCapture {
                id: 10,
                url: "https://docs.rs".to_string(),
                title: Some("Docs.rs".to_string()),
                favicon: None,
                group: Some(7),
            },
            TabCapture {
                id: 11,
                url: "https://crates.io".to_string(),
                title: Some("crates.io".to_string()),
                favicon: None,
                group: Some(7),
            },
            TabCapture {
                id: 12,
                url: "https://news.example.com".to_string(),
                title: Some("Morning News".to_string()),
                favicon: None,
                group: None,
            },
        ],
        groups: vec![GroupHandle {
            id: 7,
            title: "Rust Work".to_string(),
        }],
    }]
}

fn demo_database() {
    section("Storage Layer");

    let db = Database::open_in_memory().expect("Failed to open database");
    db.kv_set("demo", "{\"hello\":true}").unwrap();
    let value = db.kv_get("demo").unwrap();
    println!("  kv_store roundtrip: {:?}", value);
    println!("  ✓ Database + migrations OK");
    println!();
}

fn demo_settings() {
    section("Settings Engine");

    let path = std::env::temp_dir().join("tabstash-demo-settings.json");
    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    engine.load().unwrap();
    println!("  Language: {}", engine.get_settings().general.language);
    println!("  Save directory: {:?}", engine.save_directory());

    engine
        .set_value("storage.save_directory", serde_json::json!("/tmp/tab-exports"))
        .unwrap();
    println!("  Changed save directory to: {:?}", engine.save_directory());
    let _ = std::fs::remove_file(path);
    println!("  ✓ SettingsEngine OK");
    println!();
}

fn demo_sanitizer() {
    section("Name Sanitizer");

    for raw in ["My Group!!", "Café Crème", "con", "!!!"] {
        println!("  {:?} -> {:?}", raw, name_sanitizer::sanitize(raw));
    }
    println!("  ✓ NameSanitizer OK");
    println!();
}

fn demo_collector() {
    section("Snapshot Collector");

    let captured = snapshot_collector::collect(&sample_windows());
    for (key, group) in &captured {
        println!(
            "  {} -> '{}' ({} tabs{})",
            key,
            group.title,
            group.tabs.len(),
            if group.ungrouped { ", ungrouped" } else { "" }
        );
    }
    println!("  ✓ SnapshotCollector OK");
    println!();
}

fn demo_store() {
    section("Group Store");

    let db = Arc::new(Database::open_in_memory().expect("Failed to open database"));
    let store = GroupStore::new(db);

    let captured = snapshot_collector::collect(&sample_windows());
    let outcome = store.merge(&captured).unwrap();
    println!("  Merged {} group(s): {:?}", outcome.inserted.len(), outcome.inserted);

    let key = &outcome.inserted[0];
    match store.remove_tab(key, 0).unwrap() {
        TabRemoval::Removed { remaining } => println!("  Removed a tab, {} remaining", remaining),
        TabRemoval::GroupDeleted => println!("  Group deleted"),
    }
    println!("  ✓ GroupStore OK");
    println!();
}

fn demo_archive() {
    section("Archive Codec");

    let mut groups = GroupMap::new();
    groups.insert(
        "work_1700000000000".to_string(),
        Group::saved(
            "work",
            vec![Tab::new("https://docs.rs", Some("Docs.rs"), None)],
            1_700_000_000_000,
        ),
    );

    let bytes = archive_codec::pack(&groups).unwrap();
    println!("  Packed {} group(s) into {} bytes", groups.len(), bytes.len());
    let unpacked = archive_codec::unpack(&bytes, 1_700_000_000_001).unwrap();
    assert_eq!(unpacked, groups);
    println!("  Unpacked mapping matches the original");
    println!("  ✓ ArchiveCodec OK");
    println!();
}

async fn demo_gateway() {
    section("Persistence Gateway");

    let dir = std::env::temp_dir().join("tabstash-demo-writes");
    let (writer, events) = FsWriter::channel();
    let (gateway, mut completions) = PersistenceGateway::new(writer, events);

    let config = WriteConfig {
        save_directory: Some(dir.clone()),
    };
    let ticket = gateway
        .request_write(
            WriteRequest::group("Demo Group", b"{\"demo\":true}".to_vec()),
            &config,
        )
        .unwrap();
    println!("  Acknowledged write {} as {}", ticket.id, ticket.filename);

    if let Some(completion) = completions.recv().await {
        match completion.result {
            Ok(path) => println!("  Completed: {}", path),
            Err(err) => println!("  Failed: {}", err),
        }
    }
    let _ = std::fs::remove_dir_all(dir);
    println!("  ✓ PersistenceGateway OK");
    println!();
}

/// Minimal in-memory host so the demo can show a restore without a real
/// browser.
#[derive(Default)]
struct DemoHost {
    next_id: i64,
    opened: Vec<(i64, String)>,
    group_title: Option<String>,
}

impl HostBrowser for DemoHost {
    fn create_window(&mut self) -> Result<i64, RestoreError> {
        self.next_id += 1;
        Ok(self.next_id)
    }

    fn window_tabs(&self, _window: i64) -> Result<Vec<i64>, RestoreError> {
        Ok(Vec::new())
    }

    fn create_tab(&mut self, _window: i64, url: &str) -> Result<i64, RestoreError> {
        self.next_id += 1;
        self.opened.push((self.next_id, url.to_string()));
        Ok(self.next_id)
    }

    fn group_tabs(&mut self, _tabs: &[i64]) -> Result<i64, RestoreError> {
        self.next_id += 1;
        Ok(self.next_id)
    }

    fn set_group_title(&mut self, _group: i64, title: &str) -> Result<(), RestoreError> {
        self.group_title = Some(title.to_string());
        Ok(())
    }

    fn remove_tab(&mut self, tab: i64) -> Result<(), RestoreError> {
        self.opened.retain(|(id, _)| *id != tab);
        Ok(())
    }

    fn ungroup_tab(&mut self, _tab: i64) -> Result<(), RestoreError> {
        Ok(())
    }
}

fn demo_restore() {
    section("Group Restorer");

    let group = Group::saved(
        "work",
        vec![
            Tab::new("https://docs.rs", Some("Docs.rs"), None),
            Tab::new("https://crates.io", Some("crates.io"), None),
        ],
        1_700_000_000_000,
    );

    let mut host = DemoHost::default();
    let window = group_restorer::open_group(&mut host, &group).unwrap();
    println!(
        "  Opened window {} with {} tab(s) in group {:?}",
        window,
        host.opened.len(),
        host.group_title
    );
    println!("  ✓ GroupRestorer OK");
    println!();
}

async fn demo_app() {
    section("App Core");

    let settings_path = std::env::temp_dir().join("tabstash-demo-app-settings.json");
    let export_dir = std::env::temp_dir().join("tabstash-demo-app-writes");
    std::fs::write(
        &settings_path,
        serde_json::json!({
            "general": { "language": "en" },
            "storage": { "save_directory": export_dir.to_string_lossy() }
        })
        .to_string(),
    )
    .unwrap();

    let (app, mut events) = tabstash::app::App::in_memory(Some(
        settings_path.to_string_lossy().to_string(),
    ))
    .expect("Failed to initialize app");
    println!(
        "  Configured save directory: {:?}",
        app.settings_engine.save_directory()
    );

    let report = app.sync_windows(&sample_windows()).unwrap();
    println!(
        "  Synced: {} merged, {} skipped, {} write(s) dispatched",
        report.merged.len(),
        report.skipped.len(),
        report.dispatched.len()
    );

    while let Ok(Some(event)) =
        tokio::time::timeout(std::time::Duration::from_secs(5), events.recv()).await
    {
        match event {
            Event::GroupsUpdated { groups } => {
                println!("  groupsUpdated: {} stored group(s)", groups.len())
            }
            Event::SaveFileComplete {
                group_title,
                result,
            } => {
                println!("  saveFileComplete for '{}': {:?}", group_title, result);
                break;
            }
        }
    }

    let _ = std::fs::remove_file(settings_path);
    let _ = std::fs::remove_dir_all(export_dir);
    println!("  ✓ App Core OK");
    println!();
}
