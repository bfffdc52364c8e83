use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tab::Tab;

/// A named, ordered collection of tabs.
///
/// `saved_at == None` marks a live view of currently open tabs; such a group
/// is never itself persisted. A copy with `saved_at` set is what gets written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub title: String,
    pub tabs: Vec<Tab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<i64>,
    #[serde(default, rename = "isUngrouped", skip_serializing_if = "is_false")]
    pub ungrouped: bool,
}

/// The group mapping as persisted under the `savedGroups` storage key.
/// BTreeMap keeps serialization and fan-out order deterministic.
pub type GroupMap = BTreeMap<String, Group>;

impl Group {
    /// A live (not yet persisted) group.
    pub fn live(title: &str, tabs: Vec<Tab>) -> Self {
        Self {
            title: title.to_string(),
            tabs,
            saved_at: None,
            ungrouped: false,
        }
    }

    /// A persisted snapshot with `saved_at` stamped.
    pub fn saved(title: &str, tabs: Vec<Tab>, saved_at: i64) -> Self {
        Self {
            title: title.to_string(),
            tabs,
            saved_at: Some(saved_at),
            ungrouped: false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.saved_at.is_none()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}
