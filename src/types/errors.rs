use std::fmt;

// === StoreError ===

/// Errors related to the saved-group store.
#[derive(Debug)]
pub enum StoreError {
    /// No saved group exists under the given key.
    NotFound(String),
    /// A tab index was out of range for the given group.
    TabIndexOutOfRange { key: String, index: usize },
    /// The group payload is not persistable (empty title or tab list).
    InvalidGroup(String),
    /// The underlying key-value storage failed.
    Storage(String),
    /// The stored mapping could not be (de)serialized.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(key) => write!(f, "Saved group not found: {}", key),
            StoreError::TabIndexOutOfRange { key, index } => {
                write!(f, "Tab index {} out of range for group {}", index, key)
            }
            StoreError::InvalidGroup(msg) => write!(f, "Invalid group data: {}", msg),
            StoreError::Storage(msg) => write!(f, "Group storage error: {}", msg),
            StoreError::Serialization(msg) => {
                write!(f, "Group serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === WriteError ===

/// Errors related to durable-write requests.
#[derive(Debug, Clone)]
pub enum WriteError {
    /// The request is missing a name or content.
    Validation(String),
    /// No usable destination directory could be resolved.
    Configuration(String),
    /// The underlying write reported failure; carries its message verbatim.
    Failed(String),
    /// The write never reached a terminal state within the bounded wait.
    /// The outcome is unknown; the write may still land later.
    TimedOut(String),
    /// The write-event channel closed before a terminal state was observed.
    Channel(String),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::Validation(msg) => {
                write!(f, "Missing required data: {}", msg)
            }
            WriteError::Configuration(msg) => {
                write!(f, "No usable save destination: {}", msg)
            }
            WriteError::Failed(msg) => write!(f, "File save failed: {}", msg),
            WriteError::TimedOut(name) => {
                write!(f, "File save timed out with unknown outcome: {}", name)
            }
            WriteError::Channel(msg) => write!(f, "Write channel closed: {}", msg),
        }
    }
}

impl std::error::Error for WriteError {}

// === ArchiveError ===

/// Errors related to export archive encoding and decoding.
#[derive(Debug)]
pub enum ArchiveError {
    /// The container or its inner document is malformed.
    Format(String),
    /// An I/O error occurred while reading or writing the container.
    Io(String),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::Format(msg) => write!(f, "Invalid archive format: {}", msg),
            ArchiveError::Io(msg) => write!(f, "Archive I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ArchiveError {}

// === RestoreError ===

/// Errors related to opening saved groups back into the host browser.
#[derive(Debug)]
pub enum RestoreError {
    /// No saved group exists under the given key.
    NotFound(String),
    /// The host browser rejected an operation.
    Host(String),
    /// The saved-group store could not be read.
    Store(String),
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::NotFound(key) => write!(f, "Saved group not found: {}", key),
            RestoreError::Host(msg) => write!(f, "Host browser error: {}", msg),
            RestoreError::Store(msg) => write!(f, "Group store error: {}", msg),
        }
    }
}

impl std::error::Error for RestoreError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
