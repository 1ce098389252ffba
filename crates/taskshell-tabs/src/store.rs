//! Tab Store
//!
//! Ordered collection of a task's tabs with a selected-tab pointer.

use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::recency::most_recent;
use crate::tab::{Tab, TabDraft, TabId};
use crate::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabStore {
    /// Tabs in strip order
    tabs: Vec<Tab>,
    /// Currently selected tab, if any
    selected: Option<TabId>,
}

impl TabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tab at the end of the strip, returning its new id
    pub fn add(&mut self, draft: TabDraft) -> TabId {
        let tab = Tab::from_draft(draft);
        let id = tab.id;
        self.tabs.push(tab);

        tracing::debug!(tab_id = %id, "Added tab record");

        id
    }

    pub fn get(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == *id)
    }

    pub fn get_mut(&mut self, id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == *id)
    }

    pub fn contains(&self, id: &TabId) -> bool {
        self.get(id).is_some()
    }

    /// Tab at a strip position; negative or out-of-range positions yield nothing
    pub fn get_at(&self, index: isize) -> Option<&Tab> {
        usize::try_from(index).ok().and_then(|i| self.tabs.get(i))
    }

    pub fn index_of(&self, id: &TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == *id)
    }

    /// Remove a tab, returning the index it occupied
    pub fn destroy(&mut self, id: &TabId) -> Option<usize> {
        let index = self.index_of(id)?;
        self.tabs.remove(index);

        if self.selected == Some(*id) {
            self.selected = None;
        }

        Some(index)
    }

    pub fn selected(&self) -> Option<TabId> {
        self.selected
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected.and_then(|id| self.get(&id))
    }

    /// Select a tab and stamp its activity time
    pub fn set_selected(&mut self, id: &TabId) -> Result<()> {
        let tab = self.get_mut(id).ok_or(TabError::NotFound(*id))?;
        tab.touch();
        self.selected = Some(*id);
        Ok(())
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    pub fn set_url(&mut self, id: &TabId, url: String) -> Result<()> {
        let tab = self.get_mut(id).ok_or(TabError::NotFound(*id))?;
        tab.url = Some(url);
        Ok(())
    }

    /// The tab to show once `id` is gone: its left neighbour, else its right one
    pub fn neighbor_of(&self, id: &TabId) -> Option<TabId> {
        let index = self.index_of(id)? as isize;
        self.get_at(index - 1)
            .or_else(|| self.get_at(index + 1))
            .map(|t| t.id)
    }

    /// The most recently active tab, earliest in strip order on ties
    pub fn most_recent(&self) -> Option<TabId> {
        most_recent(self.tabs.iter().map(|t| (t.id, t.last_activity)))
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }
}
