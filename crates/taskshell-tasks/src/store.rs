//! Task Store
//!
//! Ordered collection of tasks with the global selected-task pointer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskshell_tabs::{most_recent, TabDraft, TabId, TabStore};

use crate::error::TaskError;
use crate::task::{Task, TaskId};
use crate::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    /// Tasks in creation order
    tasks: Vec<Task>,
    /// Currently selected task
    selected: Option<TaskId>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty task, returning its id
    pub fn add(&mut self) -> TaskId {
        let task = Task::new();
        let id = task.id;
        self.tasks.push(task);

        tracing::debug!(task_id = %id, "Added task record");

        id
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == *id)
    }

    /// Remove a task and everything it owns
    pub fn destroy(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == *id)?;

        if self.selected == Some(*id) {
            self.selected = None;
        }

        Some(self.tasks.remove(index))
    }

    pub fn selected(&self) -> Option<TaskId> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.get(&id))
    }

    pub fn selected_task_mut(&mut self) -> Option<&mut Task> {
        let id = self.selected?;
        self.get_mut(&id)
    }

    /// Select a task and stamp its activity time
    pub fn set_selected(&mut self, id: &TaskId) -> Result<()> {
        let task = self.get_mut(id).ok_or(TaskError::NotFound(*id))?;
        task.touch();
        self.selected = Some(*id);
        Ok(())
    }

    pub fn last_activity(&self, id: &TaskId) -> Option<DateTime<Utc>> {
        self.get(id).map(|t| t.last_activity)
    }

    /// The most recently active task, earliest in order on ties
    pub fn most_recent(&self) -> Option<TaskId> {
        most_recent(self.tasks.iter().map(|t| (t.id, t.last_activity)))
    }

    /// The task owning a tab
    pub fn owner_of(&self, tab_id: &TabId) -> Option<TaskId> {
        self.tasks
            .iter()
            .find(|t| t.tabs.contains(tab_id))
            .map(|t| t.id)
    }

    pub fn tabs(&self, id: &TaskId) -> Option<&TabStore> {
        self.get(id).map(|t| &t.tabs)
    }

    pub fn tabs_mut(&mut self, id: &TaskId) -> Option<&mut TabStore> {
        self.get_mut(id).map(|t| &mut t.tabs)
    }

    /// Tabs of the selected task
    pub fn selected_tabs(&self) -> Result<&TabStore> {
        self.selected_task()
            .map(|t| &t.tabs)
            .ok_or(TaskError::NoSelectedTask)
    }

    /// Insert a tab record into the selected task
    pub fn add_tab(&mut self, draft: TabDraft) -> Result<TabId> {
        let task = self.selected_task_mut().ok_or(TaskError::NoSelectedTask)?;
        Ok(task.tabs.add(draft))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }
}
