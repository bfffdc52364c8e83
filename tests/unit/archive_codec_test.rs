use std::io::Write;

use tabstash::services::archive_codec::{
    decode_import, pack, parse_groups, unpack, ARCHIVE_ENTRY,
};
use tabstash::types::errors::ArchiveError;
use tabstash::types::group::{Group, GroupMap};
use tabstash::types::tab::{Tab, UNTITLED};

fn sample_groups() -> GroupMap {
    let mut groups = GroupMap::new();
    groups.insert(
        "work_1700000000000".to_string(),
        Group::saved(
            "work",
            vec![
                Tab::new("https://docs.rs", Some("Docs.rs"), None),
                Tab::new("https://crates.io", Some("crates.io"), None),
            ],
            1_700_000_000_000,
        ),
    );
    groups.insert(
        "reading_1700000000500".to_string(),
        Group::saved(
            "reading",
            vec![Tab::new("https://blog.example.com", Some("Blog"), None)],
            1_700_000_000_500,
        ),
    );
    groups
}

#[test]
fn test_pack_unpack_roundtrip_preserves_saved_at() {
    let groups = sample_groups();
    let bytes = pack(&groups).unwrap();
    // The stamping time must not touch entries that already carry savedAt.
    let unpacked = unpack(&bytes, 1_999_999_999_999).unwrap();
    assert_eq!(unpacked, groups);
}

#[test]
fn test_unpack_rejects_garbage_bytes() {
    match unpack(b"definitely not a zip", 0) {
        Err(ArchiveError::Format(_)) => {}
        other => panic!("expected FormatError, got {:?}", other),
    }
}

#[test]
fn test_unpack_rejects_archive_without_wellknown_entry() {
    // A valid zip whose single entry has the wrong name.
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("something-else.json", zip::write::FileOptions::default())
        .unwrap();
    zip.write_all(b"{}").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    match unpack(&bytes, 0) {
        Err(ArchiveError::Format(msg)) => assert!(msg.contains(ARCHIVE_ENTRY)),
        other => panic!("expected FormatError, got {:?}", other),
    }
}

#[test]
fn test_unpack_rejects_invalid_inner_json() {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file(ARCHIVE_ENTRY, zip::write::FileOptions::default())
        .unwrap();
    zip.write_all(b"{ not json }").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    assert!(matches!(unpack(&bytes, 0), Err(ArchiveError::Format(_))));
}

#[test]
fn test_parse_groups_stamps_missing_saved_at() {
    let json = br#"{"g1": {"title": "X", "tabs": [{"url": "https://a"}]}}"#;
    let groups = parse_groups(json, 1_700_000_123_456).unwrap();

    let group = &groups["g1"];
    assert_eq!(group.saved_at, Some(1_700_000_123_456));
    // Display defaults fill in on deserialization
    assert_eq!(group.tabs[0].title, UNTITLED);
}

#[test]
fn test_parse_groups_keeps_existing_saved_at() {
    let json = br#"{"g1": {"title": "X", "savedAt": 42, "tabs": [{"url": "https://a"}]}}"#;
    let groups = parse_groups(json, 1_700_000_123_456).unwrap();
    assert_eq!(groups["g1"].saved_at, Some(42));
}

#[test]
fn test_parse_groups_rejects_invalid_json() {
    assert!(matches!(
        parse_groups(b"[1, 2, 3]", 0),
        Err(ArchiveError::Format(_))
    ));
}

#[test]
fn test_decode_import_selects_codec_by_extension() {
    let groups = sample_groups();
    let zipped = pack(&groups).unwrap();
    let bare = serde_json::to_vec(&groups).unwrap();

    assert_eq!(decode_import("export.zip", &zipped, 0).unwrap(), groups);
    assert_eq!(decode_import("export.ZIP", &zipped, 0).unwrap(), groups);
    assert_eq!(decode_import("export.json", &bare, 0).unwrap(), groups);
}

#[test]
fn test_decode_import_zip_extension_with_json_content_fails() {
    let bare = serde_json::to_vec(&sample_groups()).unwrap();
    assert!(matches!(
        decode_import("export.zip", &bare, 0),
        Err(ArchiveError::Format(_))
    ));
}
