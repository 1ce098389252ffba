//! Tab strip UI contract

use taskshell_tabs::TabId;

/// The visual tab strip. Commands only; the strip never reports state back.
pub trait TabStrip: Send + Sync {
    fn add_tab(&self, tab_id: &TabId);

    fn remove_tab(&self, tab_id: &TabId);

    /// Highlight the tab as the active one
    fn set_active_tab(&self, tab_id: &TabId);

    /// Redraw every tab, e.g. after the selected task changed
    fn rerender_all(&self);

    /// Put the tab's address into editing mode
    fn enter_edit_mode(&self, tab_id: &TabId);

    fn leave_edit_mode(&self);

    fn scroll_into_view(&self, tab_id: &TabId);

    /// Dismiss the task overview if it is showing
    fn hide_task_overview(&self);
}
