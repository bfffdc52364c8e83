use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::WriteError;

/// Fallback subfolder used when no save directory is configured.
pub const FALLBACK_SUBFOLDER: &str = "local-tabs";

/// A durable-write request as accepted by the persistence gateway.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Correlation name; completion events are addressed by it.
    pub name: String,
    pub content: Vec<u8>,
    /// Per-request destination override; wins over the configured directory.
    pub destination_hint: Option<String>,
    /// Explicit target filename. When `None` the gateway derives
    /// `<sanitized-name>_<timestamp>.json`.
    pub filename: Option<String>,
}

impl WriteRequest {
    /// A per-group JSON write; the gateway derives the filename.
    pub fn group(name: &str, content: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content,
            destination_hint: None,
            filename: None,
        }
    }

    /// A write with an explicit filename (e.g. an export archive).
    pub fn named(name: &str, filename: &str, content: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content,
            destination_hint: None,
            filename: Some(filename.to_string()),
        }
    }

    pub fn with_destination(mut self, hint: &str) -> Self {
        self.destination_hint = Some(hint.to_string());
        self
    }
}

/// Destination configuration, built from settings by the caller per request.
/// The gateway never reads ambient configuration state.
#[derive(Debug, Clone, Default)]
pub struct WriteConfig {
    pub save_directory: Option<PathBuf>,
}

/// Immediate acknowledgment for an accepted write request. Receiving a
/// ticket never means the write completed; the final path arrives in the
/// separate completion event.
#[derive(Debug, Clone)]
pub struct WriteTicket {
    pub id: String,
    pub filename: String,
}

/// Phase of a write request's three-phase lifecycle.
///
/// `Sent` → `Acknowledged` on receipt, `Acknowledged` → `Completed`/`Failed`
/// on the terminal write outcome, any state → `TimedOut` after a bounded
/// wait with no terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Sent,
    Acknowledged,
    Completed,
    Failed,
    TimedOut,
}

/// State transition reported by a durable writer for one write operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum WriteState {
    InProgress,
    Completed { path: String },
    Errored { message: String },
}

impl WriteState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WriteState::InProgress)
    }
}

/// One event on a durable writer's shared event stream.
#[derive(Debug, Clone)]
pub struct WriteEvent {
    pub id: String,
    pub state: WriteState,
}

/// Out-of-band completion notification, addressed by the request's name.
#[derive(Debug, Clone)]
pub struct WriteCompletion {
    pub id: String,
    pub group_title: String,
    pub phase: WritePhase,
    pub result: Result<String, WriteError>,
}
