//! Restoring saved groups back into the host browser.
//!
//! The host browser is behind a trait so the restore flow can run against
//! a real binding or a recording mock; the crate itself never talks to a
//! browser API directly.

use crate::types::errors::RestoreError;
use crate::types::group::Group;

/// Operations the host browser must provide for restore and live edits.
pub trait HostBrowser {
    fn create_window(&mut self) -> Result<i64, RestoreError>;
    /// Tab ids currently in the window, in order.
    fn window_tabs(&self, window: i64) -> Result<Vec<i64>, RestoreError>;
    fn create_tab(&mut self, window: i64, url: &str) -> Result<i64, RestoreError>;
    /// Groups the tabs together; returns the new group's id.
    fn group_tabs(&mut self, tabs: &[i64]) -> Result<i64, RestoreError>;
    fn set_group_title(&mut self, group: i64, title: &str) -> Result<(), RestoreError>;
    fn remove_tab(&mut self, tab: i64) -> Result<(), RestoreError>;
    fn ungroup_tab(&mut self, tab: i64) -> Result<(), RestoreError>;
}

/// Opens a saved group as a new window: one tab per saved tab in order,
/// grouped under the saved title. The blank tab the host creates with a new
/// window is removed afterwards. Returns the new window's id.
pub fn open_group(host: &mut dyn HostBrowser, group: &Group) -> Result<i64, RestoreError> {
    let window = host.create_window()?;
    let initial_tabs = host.window_tabs(window)?;

    let mut opened = Vec::with_capacity(group.tabs.len());
    for tab in &group.tabs {
        opened.push(host.create_tab(window, &tab.url)?);
    }

    let group_id = host.group_tabs(&opened)?;
    host.set_group_title(group_id, &group.title)?;

    for tab in initial_tabs {
        host.remove_tab(tab)?;
    }

    Ok(window)
}

/// Renames a live (currently open) tab group through the host.
pub fn rename_live_group(
    host: &mut dyn HostBrowser,
    group_id: i64,
    new_title: &str,
) -> Result<(), RestoreError> {
    host.set_group_title(group_id, new_title)
}

/// Detaches one live tab from its group through the host.
pub fn remove_tab_from_live_group(
    host: &mut dyn HostBrowser,
    tab_id: i64,
) -> Result<(), RestoreError> {
    host.ungroup_tab(tab_id)
}
