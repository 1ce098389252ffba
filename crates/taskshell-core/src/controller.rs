//! Lifecycle controller
//!
//! Every operation runs to completion before the next one starts. The task
//! store lock is never held while a collaborator is called, because
//! collaborators may answer synchronously with view events that re-enter here.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::runtime::Handle;

use taskshell_navigation::UrlParse;
use taskshell_tabs::{Tab, TabDraft, TabId};
use taskshell_tasks::{TaskId, TaskStore};

use crate::config::Config;
use crate::content::ContentHost;
use crate::error::CoreError;
use crate::events::{
    Disposition, EventHub, EventKind, Listen, SubscriptionId, ViewEvent, CLOSE_WINDOW_CHANNEL,
};
use crate::focus::FocusPolicy;
use crate::strip::TabStrip;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddTabOptions {
    /// Put the strip into address editing for the new tab. Defaults to true.
    pub enter_edit_mode: bool,
    /// Add the tab without switching to it. Defaults to false.
    pub open_in_background: bool,
}

impl Default for AddTabOptions {
    fn default() -> Self {
        Self {
            enter_edit_mode: true,
            open_in_background: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOptions {
    /// Give the content view keyboard focus. Defaults to true.
    pub focus_webview: bool,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            focus_webview: true,
        }
    }
}

/// External subsystems the controller drives
#[derive(Clone)]
pub struct Collaborators {
    pub content: Arc<dyn ContentHost>,
    pub strip: Arc<dyn TabStrip>,
    pub focus: Arc<dyn FocusPolicy>,
    pub urls: Arc<dyn UrlParse>,
}

pub struct LifecycleController {
    pub(crate) config: Config,
    pub(crate) tasks: RwLock<TaskStore>,
    pub(crate) content: Arc<dyn ContentHost>,
    strip: Arc<dyn TabStrip>,
    focus: Arc<dyn FocusPolicy>,
    urls: Arc<dyn UrlParse>,
    pub(crate) events: Arc<EventHub>,
    /// Runtime for scroll queries and delayed scroll writes
    pub(crate) runtime: Handle,
}

impl LifecycleController {
    pub fn new(
        config: Config,
        tasks: TaskStore,
        collaborators: Collaborators,
        runtime: Handle,
    ) -> Self {
        Self {
            config,
            tasks: RwLock::new(tasks),
            content: collaborators.content,
            strip: collaborators.strip,
            focus: collaborators.focus,
            urls: collaborators.urls,
            events: Arc::new(EventHub::new()),
            runtime,
        }
    }

    /// Show the selected (or most recent) task, creating one if there are none
    pub fn initialize(&self) -> Result<()> {
        let target = {
            let tasks = self.tasks.read();
            tasks.selected().or_else(|| tasks.most_recent())
        };

        match target {
            Some(task_id) => self.switch_to_task(&task_id),
            None => self.add_task().map(|_| ()),
        }?;

        tracing::info!("Lifecycle controller initialized");

        Ok(())
    }

    /// Subscribe to the inbound view events: new-window requests open a tab,
    /// close-window messages close the sender's tab.
    pub fn bind_view_events(self: &Arc<Self>) -> [SubscriptionId; 2] {
        let controller = Arc::downgrade(self);
        let new_window = self.events.bind(EventKind::NewWindow, move |event| {
            let Some(controller) = controller.upgrade() else {
                return Listen::Stop;
            };
            if let ViewEvent::NewWindow {
                tab_id,
                url,
                disposition,
                ..
            } = event
            {
                if let Err(e) = controller.open_requested_window(tab_id, url, disposition) {
                    tracing::warn!(tab_id = %tab_id, error = %e, "Failed to open requested window");
                }
            }
            Listen::Continue
        });

        let controller = Arc::downgrade(self);
        let close_window = self.events.bind(EventKind::Ipc, move |event| {
            let Some(controller) = controller.upgrade() else {
                return Listen::Stop;
            };
            if let ViewEvent::Ipc { tab_id, channel, .. } = event {
                if channel == CLOSE_WINDOW_CHANNEL {
                    if let Err(e) = controller.close_tab(tab_id) {
                        tracing::warn!(tab_id = %tab_id, error = %e, "Failed to close tab");
                    }
                }
            }
            Listen::Continue
        });

        [new_window, close_window]
    }

    // === Queries ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The bus the content host emits view events on
    pub fn events(&self) -> Arc<EventHub> {
        Arc::clone(&self.events)
    }

    pub fn with_tasks<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TaskStore) -> T,
    {
        f(&self.tasks.read())
    }

    pub fn selected_task(&self) -> Option<TaskId> {
        self.tasks.read().selected()
    }

    /// Selected tab of the selected task
    pub fn selected_tab(&self) -> Option<TabId> {
        self.tasks.read().selected_task()?.tabs.selected()
    }

    pub fn tab(&self, tab_id: &TabId) -> Option<Tab> {
        let tasks = self.tasks.read();
        let owner = tasks.owner_of(tab_id)?;
        tasks.tabs(&owner)?.get(tab_id).cloned()
    }

    /// Create a tab record in the selected task without showing it
    pub fn insert_tab(&self, draft: TabDraft) -> Result<TabId> {
        Ok(self.tasks.write().add_tab(draft)?)
    }

    // === Tabs ===

    /// Show a tab from the selected task, minting an empty one when `tab_id` is None.
    ///
    /// Unless opening in the background, an empty selected tab is thrown away
    /// first when the new tab is private (and the current one is not) or
    /// already has a url.
    pub fn add_tab(&self, tab_id: Option<TabId>, options: AddTabOptions) -> Result<TabId> {
        let tab_id = match tab_id {
            Some(id) => id,
            None => self.insert_tab(TabDraft::new())?,
        };

        let replaced = {
            let tasks = self.tasks.read();
            let tabs = tasks.selected_tabs()?;
            let incoming = tabs.get(&tab_id).ok_or(CoreError::TabNotFound(tab_id))?;

            if options.open_in_background {
                None
            } else {
                tabs.selected_tab()
                    .filter(|current| current.id != tab_id && replaces(current, incoming))
                    .map(|current| current.id)
            }
        };

        if let Some(current) = replaced {
            tracing::debug!(tab_id = %current, replacement = %tab_id, "Replacing empty tab");
            self.destroy_tab(&current)?;
        }

        self.strip.add_tab(&tab_id);
        self.content.add(&tab_id);

        if options.open_in_background {
            self.strip.scroll_into_view(&tab_id);
        } else {
            self.switch_to_tab(
                &tab_id,
                SwitchOptions {
                    focus_webview: !options.enter_edit_mode,
                },
            )?;
            if options.enter_edit_mode {
                self.strip.enter_edit_mode(&tab_id);
            }
        }

        tracing::info!(
            tab_id = %tab_id,
            background = options.open_in_background,
            "Added tab"
        );

        Ok(tab_id)
    }

    /// Remove a tab's strip element, record and content view. Selection is not repaired.
    pub fn destroy_tab(&self, tab_id: &TabId) -> Result<()> {
        let owner = self.owner_of(tab_id)?;

        self.strip.remove_tab(tab_id);
        if let Some(tabs) = self.tasks.write().tabs_mut(&owner) {
            tabs.destroy(tab_id);
        }
        self.content.destroy(tab_id);

        tracing::info!(tab_id = %tab_id, "Destroyed tab");

        Ok(())
    }

    /// Destroy a tab and show its left neighbour, else its right one, else a new tab
    pub fn close_tab(&self, tab_id: &TabId) -> Result<()> {
        if self.restricted() {
            return Ok(());
        }

        let (owner, owner_shown, was_selected, next) = {
            let tasks = self.tasks.read();
            let owner = tasks
                .owner_of(tab_id)
                .ok_or(CoreError::TabNotFound(*tab_id))?;
            let tabs = tasks.tabs(&owner).ok_or(CoreError::TaskNotFound(owner))?;
            (
                owner,
                tasks.selected() == Some(owner),
                tabs.selected() == Some(*tab_id),
                tabs.neighbor_of(tab_id),
            )
        };

        self.destroy_tab(tab_id)?;

        if !was_selected {
            return Ok(());
        }

        match (owner_shown, next) {
            (true, Some(next)) => self.switch_to_tab(&next, SwitchOptions::default()),
            (true, None) => self.add_tab(None, AddTabOptions::default()).map(|_| ()),
            // Hidden task: only move its selection, the strip is showing another task
            (false, Some(next)) => {
                if let Some(tabs) = self.tasks.write().tabs_mut(&owner) {
                    tabs.set_selected(&next)?;
                }
                Ok(())
            }
            (false, None) => Ok(()),
        }
    }

    pub fn switch_to_tab(&self, tab_id: &TabId, options: SwitchOptions) -> Result<()> {
        if self.restricted() {
            return Ok(());
        }

        // Only tabs of the shown task can be switched to
        let owner = self.owner_of(tab_id)?;
        if self.tasks.read().selected() != Some(owner) {
            return Err(CoreError::TabNotFound(*tab_id));
        }

        self.strip.leave_edit_mode();
        {
            let mut tasks = self.tasks.write();
            let tabs = tasks
                .tabs_mut(&owner)
                .ok_or(CoreError::TaskNotFound(owner))?;
            tabs.set_selected(tab_id)?;
        }
        self.strip.set_active_tab(tab_id);
        self.content.set_selected(tab_id, options.focus_webview);

        tracing::debug!(tab_id = %tab_id, focus = options.focus_webview, "Switched tab");

        Ok(())
    }

    /// Load user input in a tab, returning the normalised url
    pub fn navigate(&self, tab_id: &TabId, input: &str) -> Result<String> {
        let owner = self.owner_of(tab_id)?;
        let url = self.urls.parse(input);

        {
            let mut tasks = self.tasks.write();
            let tabs = tasks
                .tabs_mut(&owner)
                .ok_or(CoreError::TaskNotFound(owner))?;
            tabs.set_url(tab_id, url.clone())?;
        }
        self.content.update(tab_id, &url);
        self.strip.leave_edit_mode();

        tracing::debug!(tab_id = %tab_id, url = %url, "Navigated tab");

        Ok(url)
    }

    /// Open a page-requested window as a tab, inheriting the sender's privacy
    pub fn open_requested_window(
        &self,
        source: &TabId,
        url: &str,
        disposition: &Disposition,
    ) -> Result<TabId> {
        let private = self.tab(source).map(|t| t.private).unwrap_or(false);
        let tab_id = self.insert_tab(TabDraft::new().with_url(url).private(private))?;

        self.add_tab(
            Some(tab_id),
            AddTabOptions {
                enter_edit_mode: false,
                open_in_background: *disposition == Disposition::BackgroundTab,
            },
        )
    }

    // === Tasks ===

    /// Create a task, show it and open a fresh tab in it
    pub fn add_task(&self) -> Result<TaskId> {
        let task_id = {
            let mut tasks = self.tasks.write();
            let id = tasks.add();
            tasks.set_selected(&id)?;
            id
        };

        self.strip.hide_task_overview();
        self.strip.rerender_all();
        self.add_tab(None, AddTabOptions::default())?;

        tracing::info!(task_id = %task_id, "Created task");

        Ok(task_id)
    }

    /// Tear down the content views of a task's tabs and remove the task
    pub fn destroy_task(&self, task_id: &TaskId) -> Result<()> {
        let tab_ids = self
            .tasks
            .read()
            .tabs(task_id)
            .map(|tabs| tabs.ids())
            .ok_or(CoreError::TaskNotFound(*task_id))?;

        for tab_id in &tab_ids {
            self.content.destroy(tab_id);
        }
        self.tasks.write().destroy(task_id);

        tracing::info!(task_id = %task_id, tab_count = tab_ids.len(), "Destroyed task");

        Ok(())
    }

    /// Destroy a task; if it was shown, switch to the most recent remaining
    /// task or create a new one
    pub fn close_task(&self, task_id: &TaskId) -> Result<()> {
        let previous = self.tasks.read().selected();

        self.destroy_task(task_id)?;

        if previous != Some(*task_id) {
            return Ok(());
        }

        // Read activity only after the task is gone so it can't be picked
        let next = self.tasks.read().most_recent();
        match next {
            Some(next) => self.switch_to_task(&next),
            None => self.add_task().map(|_| ()),
        }
    }

    pub fn switch_to_task(&self, task_id: &TaskId) -> Result<()> {
        self.tasks.write().set_selected(task_id)?;
        self.strip.rerender_all();

        let target = {
            let tasks = self.tasks.read();
            let tabs = tasks.tabs(task_id).ok_or(CoreError::TaskNotFound(*task_id))?;
            tabs.selected().or_else(|| tabs.most_recent())
        };

        tracing::debug!(task_id = %task_id, "Switched task");

        match target {
            Some(tab_id) => self.switch_to_tab(&tab_id, SwitchOptions::default()),
            None => self.add_tab(None, AddTabOptions::default()).map(|_| ()),
        }
    }

    // === Helpers ===

    fn owner_of(&self, tab_id: &TabId) -> Result<TaskId> {
        self.tasks
            .read()
            .owner_of(tab_id)
            .ok_or(CoreError::TabNotFound(*tab_id))
    }

    /// Check the focus policy, warning when it blocks the action
    fn restricted(&self) -> bool {
        if self.focus.enabled() {
            self.focus.warn();
            true
        } else {
            false
        }
    }
}

/// Whether adding `incoming` should throw away the empty `current` tab
fn replaces(current: &Tab, incoming: &Tab) -> bool {
    current.is_empty() && ((!current.private && incoming.private) || !incoming.is_empty())
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("config", &self.config)
            .field("tasks", &*self.tasks.read())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
