//! Recording collaborators for controller tests

use std::sync::Arc;

use futures_util::future::{self, FutureExt};
use parking_lot::Mutex;
use tokio::runtime::{Builder, Handle, Runtime};

use taskshell_navigation::UrlParser;
use taskshell_tabs::TabId;
use taskshell_tasks::TaskStore;

use crate::config::Config;
use crate::content::{ContentError, ContentHost, Script, ScriptFuture};
use crate::controller::{Collaborators, LifecycleController};
use crate::focus::FocusMode;
use crate::strip::TabStrip;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Add(TabId),
    Destroy(TabId),
    Update(TabId, String),
    Select(TabId, bool),
    Script(TabId, Script),
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    scroll_y: Mutex<Option<f64>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Offset reported by scroll queries; `None` makes them fail
    pub fn set_scroll_y(&self, y: Option<f64>) {
        *self.scroll_y.lock() = y;
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

impl ContentHost for RecordingHost {
    fn add(&self, tab_id: &TabId) {
        self.record(HostCall::Add(*tab_id));
    }

    fn destroy(&self, tab_id: &TabId) {
        self.record(HostCall::Destroy(*tab_id));
    }

    fn update(&self, tab_id: &TabId, url: &str) {
        self.record(HostCall::Update(*tab_id, url.to_string()));
    }

    fn set_selected(&self, tab_id: &TabId, focus: bool) {
        self.record(HostCall::Select(*tab_id, focus));
    }

    fn call_async(&self, tab_id: &TabId, script: Script) -> ScriptFuture {
        self.record(HostCall::Script(*tab_id, script.clone()));

        let result = match script {
            Script::ReadScrollY => (*self.scroll_y.lock())
                .map(serde_json::Value::from)
                .ok_or(ContentError::ViewGone(*tab_id)),
            Script::ScrollTo { .. } => Ok(serde_json::Value::Null),
        };
        future::ready(result).boxed()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StripCall {
    Add(TabId),
    Remove(TabId),
    Activate(TabId),
    RerenderAll,
    EnterEditMode(TabId),
    LeaveEditMode,
    ScrollIntoView(TabId),
    HideTaskOverview,
}

#[derive(Default)]
pub struct RecordingStrip {
    calls: Mutex<Vec<StripCall>>,
}

impl RecordingStrip {
    pub fn calls(&self) -> Vec<StripCall> {
        self.calls.lock().clone()
    }

    pub fn edit_mode_entries(&self) -> Vec<TabId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                StripCall::EnterEditMode(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StripCall) {
        self.calls.lock().push(call);
    }
}

impl TabStrip for RecordingStrip {
    fn add_tab(&self, tab_id: &TabId) {
        self.record(StripCall::Add(*tab_id));
    }

    fn remove_tab(&self, tab_id: &TabId) {
        self.record(StripCall::Remove(*tab_id));
    }

    fn set_active_tab(&self, tab_id: &TabId) {
        self.record(StripCall::Activate(*tab_id));
    }

    fn rerender_all(&self) {
        self.record(StripCall::RerenderAll);
    }

    fn enter_edit_mode(&self, tab_id: &TabId) {
        self.record(StripCall::EnterEditMode(*tab_id));
    }

    fn leave_edit_mode(&self) {
        self.record(StripCall::LeaveEditMode);
    }

    fn scroll_into_view(&self, tab_id: &TabId) {
        self.record(StripCall::ScrollIntoView(*tab_id));
    }

    fn hide_task_overview(&self) {
        self.record(StripCall::HideTaskOverview);
    }
}

/// An initialized controller (one task, one empty selected tab) wired to recorders
pub struct Harness {
    pub controller: Arc<LifecycleController>,
    pub host: Arc<RecordingHost>,
    pub strip: Arc<RecordingStrip>,
    pub focus: Arc<FocusMode>,
    _runtime: Option<Runtime>,
}

impl Harness {
    /// For synchronous tests: the harness owns a runtime
    pub fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let handle = runtime.handle().clone();
        Self::build(Config::default(), handle, Some(runtime))
    }

    /// For `#[tokio::test]`s
    pub fn on_current_runtime(config: Config) -> Self {
        Self::build(config, Handle::current(), None)
    }

    fn build(config: Config, handle: Handle, runtime: Option<Runtime>) -> Self {
        let host = Arc::new(RecordingHost::default());
        let strip = Arc::new(RecordingStrip::default());
        let focus = Arc::new(FocusMode::new());

        let collaborators = Collaborators {
            content: host.clone(),
            strip: strip.clone(),
            focus: focus.clone(),
            urls: Arc::new(UrlParser::new()),
        };
        let controller = Arc::new(LifecycleController::new(
            config,
            TaskStore::new(),
            collaborators,
            handle,
        ));
        controller.initialize().unwrap();

        let harness = Self {
            controller,
            host,
            strip,
            focus,
            _runtime: runtime,
        };
        harness.clear_calls();
        harness
    }

    pub fn clear_calls(&self) {
        self.host.calls.lock().clear();
        self.strip.calls.lock().clear();
    }

    /// Every task has at most one selected tab, non-empty tasks exactly one,
    /// and exactly one task is selected
    pub fn assert_single_selection(&self) {
        self.controller.with_tasks(|tasks| {
            let selected = tasks.selected().expect("a task is selected");
            assert!(tasks.get(&selected).is_some(), "selected task exists");

            for task in tasks.iter() {
                if !task.tabs.is_empty() {
                    let tab = task.tabs.selected().expect("non-empty task has a selection");
                    assert!(task.tabs.contains(&tab), "selected tab exists");
                }
            }
        });
    }
}
