use serde::{Deserialize, Serialize};

/// Top-level settings container, persisted as JSON at the platform config
/// path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StashSettings {
    pub general: GeneralSettings,
    pub storage: StorageSettings,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    /// Selected UI locale tag.
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

/// Durable-write destination settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSettings {
    /// Configured save directory. `None` means the gateway falls back to
    /// its default subfolder.
    #[serde(default)]
    pub save_directory: Option<String>,
}
