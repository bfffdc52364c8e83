//! Capture of live window/tab/tab-group state into the normalized group
//! model.
//!
//! Side-effect-free: reads the host captures, performs no writes.

use crate::types::group::{Group, GroupMap};
use crate::types::host::WindowSnapshot;
use crate::types::tab::Tab;

/// Title given to declared groups the host reports without one.
pub const DEFAULT_GROUP_TITLE: &str = "New Tab Group";

/// Folds host window captures into a mapping of group key → live group.
///
/// Real groups keep the host-assigned group id as their key (re-keyed to a
/// sanitized, timestamped key only at persist time). Ungrouped tabs are not
/// dropped: each window's ungrouped tabs form one synthetic entry keyed
/// `ungrouped_<windowId>` so two windows' sets never collide, titled after
/// the first ungrouped tab plus a count suffix when more than one exists.
/// Tab order within every group preserves the host's enumeration order.
pub fn collect(windows: &[WindowSnapshot]) -> GroupMap {
    let mut out = GroupMap::new();

    for window in windows {
        for handle in &window.groups {
            let title = if handle.title.is_empty() {
                DEFAULT_GROUP_TITLE
            } else {
                handle.title.as_str()
            };
            out.entry(handle.id.to_string())
                .or_insert_with(|| Group::live(title, Vec::new()));
        }

        let mut ungrouped: Vec<Tab> = Vec::new();
        for capture in &window.tabs {
            let tab = Tab::new(
                &capture.url,
                capture.title.as_deref(),
                capture.favicon.as_deref(),
            );
            match capture.group {
                Some(group_id) => {
                    // Tabs can reference a group the host never declared;
                    // materialize it rather than losing the tab.
                    out.entry(group_id.to_string())
                        .or_insert_with(|| Group::live(DEFAULT_GROUP_TITLE, Vec::new()))
                        .tabs
                        .push(tab);
                }
                None => ungrouped.push(tab),
            }
        }

        if !ungrouped.is_empty() {
            let title = ungrouped_title(&ungrouped);
            let mut group = Group::live(&title, ungrouped);
            group.ungrouped = true;
            out.insert(format!("ungrouped_{}", window.id), group);
        }
    }

    out
}

fn ungrouped_title(tabs: &[Tab]) -> String {
    let first = &tabs[0].title;
    match tabs.len() {
        1 => first.clone(),
        n => format!("{} and {} more", first, n - 1),
    }
}
