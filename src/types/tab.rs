use serde::{Deserialize, Serialize};

/// Inline-SVG placeholder shown when a tab has no usable favicon.
pub const PLACEHOLDER_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMTYiIGhlaWdodD0iMTYiIHZpZXdCb3g9IjAgMCAxNiAxNiIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMTYiIGhlaWdodD0iMTYiIGZpbGw9IiNFNEU0RTQiLz48L3N2Zz4=";

/// Display title used when a tab reports none.
pub const UNTITLED: &str = "Untitled";

/// A captured tab. Immutable once captured; a group re-save replaces its
/// tabs wholesale rather than mutating them in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tab {
    pub url: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_favicon")]
    pub favicon: String,
}

impl Tab {
    /// Builds a tab from raw host fields, filling in display defaults.
    pub fn new(url: &str, title: Option<&str>, favicon: Option<&str>) -> Self {
        Self {
            url: url.to_string(),
            title: title
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED)
                .to_string(),
            favicon: favicon
                .filter(|f| !f.is_empty())
                .unwrap_or(PLACEHOLDER_ICON)
                .to_string(),
        }
    }
}

fn default_title() -> String {
    UNTITLED.to_string()
}

fn default_favicon() -> String {
    PLACEHOLDER_ICON.to_string()
}
