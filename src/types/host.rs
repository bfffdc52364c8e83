use serde::{Deserialize, Serialize};

/// A tab as enumerated from the host browser, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabCapture {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub favicon: Option<String>,
    /// Host tab-group membership; `None` means the tab is ungrouped.
    pub group: Option<i64>,
}

/// A tab group declared by the host for some window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupHandle {
    pub id: i64,
    pub title: String,
}

/// One host window with its tabs in enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSnapshot {
    pub id: i64,
    pub tabs: Vec<TabCapture>,
    pub groups: Vec<GroupHandle>,
}
