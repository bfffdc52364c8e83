//! Asynchronous durable-write boundary.
//!
//! A caller submits a [`WriteRequest`] and immediately gets back a
//! [`WriteTicket`], the acknowledgment phase of the three-phase protocol.
//! The actual write runs asynchronously against a [`DurableWriter`]; its
//! terminal state transition is observed by a one-shot waiter that
//! deregisters itself exactly once, and the outcome is delivered
//! out-of-band as a [`WriteCompletion`] addressed by the request's name,
//! since the initiating context may be gone by then. A bounded timeout
//! converts a write that never reaches a terminal state into
//! [`WriteError::TimedOut`].

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::services::name_sanitizer;
use crate::types::errors::WriteError;
use crate::types::write::{
    WriteCompletion, WriteConfig, WriteEvent, WritePhase, WriteRequest, WriteState, WriteTicket,
    FALLBACK_SUBFOLDER,
};

/// Default bound on the wait for a terminal write state.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for the underlying durable-write mechanism.
///
/// `begin_write` starts the operation and returns its id; state transitions
/// for that id are delivered on the writer's shared event stream. Name
/// collisions at the destination must be resolved by uniquifying, never by
/// silently overwriting.
pub trait DurableWriter: Send + Sync {
    fn begin_write(
        &self,
        dir: &Path,
        filename: &str,
        content: &[u8],
    ) -> Result<String, WriteError>;
}

type Waiter = oneshot::Sender<Result<String, WriteError>>;
type WaiterMap = Arc<Mutex<HashMap<String, Waiter>>>;

/// Gateway driving durable writes through a [`DurableWriter`].
pub struct PersistenceGateway {
    writer: Arc<dyn DurableWriter>,
    waiters: WaiterMap,
    completions: mpsc::UnboundedSender<WriteCompletion>,
    timeout: Duration,
}

impl PersistenceGateway {
    /// Creates a gateway with the default completion timeout. Returns the
    /// receiver on which completion events arrive.
    ///
    /// Must be called within a tokio runtime: the gateway spawns a task
    /// that demultiplexes the writer's event stream onto per-request
    /// waiters.
    pub fn new(
        writer: Arc<dyn DurableWriter>,
        events: mpsc::UnboundedReceiver<WriteEvent>,
    ) -> (Self, mpsc::UnboundedReceiver<WriteCompletion>) {
        Self::with_timeout(writer, events, DEFAULT_WRITE_TIMEOUT)
    }

    /// Creates a gateway with an explicit completion timeout.
    pub fn with_timeout(
        writer: Arc<dyn DurableWriter>,
        mut events: mpsc::UnboundedReceiver<WriteEvent>,
        timeout: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<WriteCompletion>) {
        let waiters: WaiterMap = Arc::new(Mutex::new(HashMap::new()));
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let dispatch_waiters = Arc::clone(&waiters);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if !event.state.is_terminal() {
                    continue;
                }
                let waiter = {
                    let Ok(mut map) = dispatch_waiters.lock() else {
                        return;
                    };
                    // Removing the waiter is the one-and-only deregistration
                    // for this request, whatever the outcome.
                    map.remove(&event.id)
                };
                if let Some(waiter) = waiter {
                    let result = match event.state {
                        WriteState::Completed { path } => Ok(path),
                        WriteState::Errored { message } => Err(WriteError::Failed(message)),
                        WriteState::InProgress => unreachable!(),
                    };
                    let _ = waiter.send(result);
                }
            }
        });

        (
            Self {
                writer,
                waiters,
                completions: completions_tx,
                timeout,
            },
            completions_rx,
        )
    }

    /// Submits a write request.
    ///
    /// Returns the acknowledgment ticket once the write has been started;
    /// the ticket never implies completion. Validation and destination
    /// errors are returned synchronously, before anything is written; every
    /// later outcome (success, failure, timeout) arrives as a
    /// [`WriteCompletion`] on the gateway's completion channel, keyed by
    /// the request's name.
    pub fn request_write(
        &self,
        request: WriteRequest,
        config: &WriteConfig,
    ) -> Result<WriteTicket, WriteError> {
        if request.name.trim().is_empty() {
            return Err(WriteError::Validation("groupName".to_string()));
        }
        if request.content.is_empty() {
            return Err(WriteError::Validation("content".to_string()));
        }

        let now = now_millis();
        let dir = resolve_destination(request.destination_hint.as_deref(), config)?;
        let filename = request.filename.clone().unwrap_or_else(|| {
            format!(
                "{}_{}.json",
                name_sanitizer::sanitize_or_fallback(&request.name, now),
                compact_timestamp(now)
            )
        });

        // Register the waiter under the registry lock spanning begin_write,
        // so the dispatcher cannot observe a terminal event first.
        let (done_tx, done_rx) = oneshot::channel();
        let id = {
            let mut map = self
                .waiters
                .lock()
                .map_err(|_| WriteError::Channel("write registry lock poisoned".to_string()))?;
            let id = self.writer.begin_write(&dir, &filename, &request.content)?;
            map.insert(id.clone(), done_tx);
            id
        };
        tracing::debug!(id = %id, file = %filename, "durable write started");

        let completions = self.completions.clone();
        let waiters = Arc::clone(&self.waiters);
        let timeout = self.timeout;
        let group_title = request.name.clone();
        let ticket = WriteTicket {
            id: id.clone(),
            filename,
        };

        tokio::spawn(async move {
            let (phase, result) = match tokio::time::timeout(timeout, done_rx).await {
                Ok(Ok(Ok(path))) => (WritePhase::Completed, Ok(path)),
                Ok(Ok(Err(err))) => (WritePhase::Failed, Err(err)),
                Ok(Err(_)) => {
                    if let Ok(mut map) = waiters.lock() {
                        map.remove(&id);
                    }
                    (
                        WritePhase::Failed,
                        Err(WriteError::Channel(
                            "writer event stream closed".to_string(),
                        )),
                    )
                }
                Err(_) => {
                    // No terminal event within the bound: deregister so the
                    // registry cannot leak, and report the unknown outcome.
                    if let Ok(mut map) = waiters.lock() {
                        map.remove(&id);
                    }
                    (
                        WritePhase::TimedOut,
                        Err(WriteError::TimedOut(group_title.clone())),
                    )
                }
            };
            match &result {
                Ok(path) => tracing::debug!(id = %id, path = %path, "durable write complete"),
                Err(err) => tracing::warn!(id = %id, error = %err, "durable write failed"),
            }
            let _ = completions.send(WriteCompletion {
                id,
                group_title,
                phase,
                result,
            });
        });

        Ok(ticket)
    }

    /// Number of writes still awaiting a terminal event. After every
    /// completion the observer must be gone, so this drains back to zero.
    pub fn pending_writes(&self) -> usize {
        self.waiters.lock().map(|m| m.len()).unwrap_or(0)
    }
}

/// Resolves the destination directory: per-request hint, then configured
/// save directory, then the unconfigured fallback subfolder. Fails with
/// [`WriteError::Configuration`] before any write if the directory cannot
/// be created.
pub fn resolve_destination(
    hint: Option<&str>,
    config: &WriteConfig,
) -> Result<PathBuf, WriteError> {
    let dir = match hint.filter(|h| !h.trim().is_empty()) {
        Some(h) => PathBuf::from(h),
        None => config
            .save_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(FALLBACK_SUBFOLDER)),
    };
    fs::create_dir_all(&dir)
        .map_err(|e| WriteError::Configuration(format!("{}: {}", dir.display(), e)))?;
    Ok(dir)
}

/// Checks that a candidate save directory exists or can be created, without
/// persisting anything.
pub fn verify_folder(path: &str) -> Result<(), WriteError> {
    if path.trim().is_empty() {
        return Err(WriteError::Configuration("empty path".to_string()));
    }
    fs::create_dir_all(path)
        .map_err(|e| WriteError::Configuration(format!("{}: {}", path, e)))?;
    Ok(())
}

/// Formats epoch milliseconds as a compact `yyyymmdd_hhmmss` UTC timestamp
/// for filenames.
pub fn compact_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y%m%d_%H%M%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

// === Filesystem writer ===

/// [`DurableWriter`] over the local filesystem. The blocking I/O runs on
/// the tokio blocking pool; state transitions are reported on the shared
/// event stream like any other writer.
pub struct FsWriter {
    events: mpsc::UnboundedSender<WriteEvent>,
}

impl FsWriter {
    /// Creates the writer together with its event stream receiver, which is
    /// normally handed straight to [`PersistenceGateway::new`].
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<WriteEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { events: tx }), rx)
    }
}

impl DurableWriter for FsWriter {
    fn begin_write(
        &self,
        dir: &Path,
        filename: &str,
        content: &[u8],
    ) -> Result<String, WriteError> {
        let id = Uuid::new_v4().to_string();
        let events = self.events.clone();
        let path = dir.join(filename);
        let content = content.to_vec();
        let op = id.clone();

        tokio::task::spawn_blocking(move || {
            let _ = events.send(WriteEvent {
                id: op.clone(),
                state: WriteState::InProgress,
            });
            let state = match write_unique(&path, &content) {
                Ok(final_path) => WriteState::Completed {
                    path: final_path.display().to_string(),
                },
                Err(e) => WriteState::Errored {
                    message: e.to_string(),
                },
            };
            let _ = events.send(WriteEvent { id: op, state });
        });

        Ok(id)
    }
}

/// Writes `content` to `path`, uniquifying on conflict:
/// `name.json`, `name (1).json`, `name (2).json`, …
fn write_unique(path: &Path, content: &[u8]) -> io::Result<PathBuf> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    for attempt in 0..1000 {
        let candidate = if attempt == 0 {
            path.to_path_buf()
        } else {
            parent.join(format!("{} ({}){}", stem, attempt, ext))
        };
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(mut file) => {
                file.write_all(content)?;
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no free filename after 1000 attempts",
    ))
}
