//! Export archive encoding and decoding.
//!
//! An export archive is a ZIP container with exactly one inner entry,
//! `tab-groups.json`, holding the canonical group mapping. Import accepts
//! either that container or a bare JSON document with the same shape,
//! selected by file extension.

use std::io::{Cursor, Read, Write};

use zip::write::FileOptions;

use crate::types::errors::ArchiveError;
use crate::types::group::GroupMap;

/// Well-known name of the single inner archive entry.
pub const ARCHIVE_ENTRY: &str = "tab-groups.json";

/// Bundles the full group mapping into a compressed container.
pub fn pack(groups: &GroupMap) -> Result<Vec<u8>, ArchiveError> {
    let json = serde_json::to_vec_pretty(groups)
        .map_err(|e| ArchiveError::Format(e.to_string()))?;

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(ARCHIVE_ENTRY, options)
        .map_err(|e| ArchiveError::Io(e.to_string()))?;
    zip.write_all(&json)
        .map_err(|e| ArchiveError::Io(e.to_string()))?;
    let cursor = zip.finish().map_err(|e| ArchiveError::Io(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Reverses [`pack`], validating the expected inner structure.
///
/// Fails with [`ArchiveError::Format`] if the well-known inner entry is
/// absent or its content is not valid JSON. Unpacked groups lacking
/// `savedAt` are stamped with `now_millis`, so every imported group is a
/// valid persisted group.
pub fn unpack(bytes: &[u8], now_millis: i64) -> Result<GroupMap, ArchiveError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ArchiveError::Format(format!("not a readable archive: {}", e)))?;

    let mut entry = archive
        .by_name(ARCHIVE_ENTRY)
        .map_err(|_| ArchiveError::Format(format!("{} not found", ARCHIVE_ENTRY)))?;

    let mut json = Vec::new();
    entry
        .read_to_end(&mut json)
        .map_err(|e| ArchiveError::Io(e.to_string()))?;

    parse_groups(&json, now_millis)
}

/// Parses a bare JSON group document, stamping `savedAt` where absent.
pub fn parse_groups(json: &[u8], now_millis: i64) -> Result<GroupMap, ArchiveError> {
    let mut groups: GroupMap = serde_json::from_slice(json)
        .map_err(|e| ArchiveError::Format(format!("invalid JSON: {}", e)))?;

    for group in groups.values_mut() {
        if group.saved_at.is_none() {
            group.saved_at = Some(now_millis);
        }
    }

    Ok(groups)
}

/// Decodes an imported file as archive or bare JSON, by extension.
pub fn decode_import(
    filename: &str,
    bytes: &[u8],
    now_millis: i64,
) -> Result<GroupMap, ArchiveError> {
    if filename.to_ascii_lowercase().ends_with(".zip") {
        unpack(bytes, now_millis)
    } else {
        parse_groups(bytes, now_millis)
    }
}
