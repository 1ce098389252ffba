//! Tab duplication
//!
//! The copy gets the source's url and privacy under a new id. The source's
//! scroll offset is fetched asynchronously and written into the copy a few
//! times after the copy's first load, since pages often ignore scrolling
//! until some time after the load event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use taskshell_tabs::{Tab, TabId};

use crate::content::Script;
use crate::controller::{AddTabOptions, LifecycleController};
use crate::error::CoreError;
use crate::events::{EventKind, Listen, SubscriptionId};
use crate::Result;

impl LifecycleController {
    /// Open a copy of a tab at the end of the strip and restore its scroll position once loaded
    pub fn duplicate_tab(&self, tab_id: &TabId) -> Result<TabId> {
        let draft = self
            .tab(tab_id)
            .as_ref()
            .map(Tab::to_draft)
            .ok_or(CoreError::TabNotFound(*tab_id))?;
        let copy = self.insert_tab(draft)?;

        // Stays 0 unless the query answers with a number
        let offset = Arc::new(Mutex::new(0.0_f64));
        self.query_scroll_offset(tab_id, Arc::clone(&offset));

        let subscription = self.restore_scroll_on_load(copy, offset);
        self.release_listener_after_timeout(subscription, copy);

        self.add_tab(
            Some(copy),
            AddTabOptions {
                enter_edit_mode: false,
                ..AddTabOptions::default()
            },
        )?;

        tracing::info!(tab_id = %tab_id, copy = %copy, "Duplicated tab");

        Ok(copy)
    }

    fn query_scroll_offset(&self, source: &TabId, offset: Arc<Mutex<f64>>) {
        let query = self.content.call_async(source, Script::ReadScrollY);
        let source = *source;

        self.runtime.spawn(async move {
            match query.await {
                Ok(value) => {
                    if let Some(y) = value.as_f64() {
                        *offset.lock() = y;
                    }
                }
                Err(e) => {
                    tracing::debug!(tab_id = %source, error = %e, "Scroll offset query failed");
                }
            }
        });
    }

    /// Listen for the copy's first load and schedule the scroll writes
    fn restore_scroll_on_load(&self, copy: TabId, offset: Arc<Mutex<f64>>) -> SubscriptionId {
        let content = Arc::clone(&self.content);
        let runtime = self.runtime.clone();
        let delays = self.config.scroll_restore_delays();
        let fired = AtomicBool::new(false);

        self.events.bind(EventKind::DidFinishLoad, move |event| {
            if event.tab_id() != copy {
                return Listen::Continue;
            }
            if fired.swap(true, Ordering::SeqCst) {
                return Listen::Stop;
            }

            for delay in &delays {
                let content = Arc::clone(&content);
                let offset = Arc::clone(&offset);
                let delay = *delay;

                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;

                    let y = *offset.lock();
                    tracing::debug!(tab_id = %copy, y, ?delay, "Restoring scroll offset");

                    if let Err(e) = content.call_async(&copy, Script::ScrollTo { y }).await {
                        tracing::debug!(tab_id = %copy, error = %e, "Scroll restore failed");
                    }
                });
            }

            Listen::Stop
        })
    }

    /// Drop the load listener if the copy never finishes loading
    fn release_listener_after_timeout(&self, subscription: SubscriptionId, copy: TabId) {
        let Some(timeout) = self.config.duplicate_listener_timeout() else {
            return;
        };
        let events = Arc::downgrade(&self.events);

        self.runtime.spawn(async move {
            tokio::time::sleep(timeout).await;

            let released = events
                .upgrade()
                .map_or(false, |events| events.unbind(subscription));
            if released {
                tracing::warn!(
                    tab_id = %copy,
                    ?timeout,
                    "Duplicate never finished loading; released its load listener"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::events::ViewEvent;
    use crate::testing::{HostCall, Harness};
    use crate::Config;
    use taskshell_tabs::TabDraft;

    /// A selected private tab showing `https://example.com/page`
    fn private_source(harness: &Harness) -> TabId {
        let controller = &harness.controller;
        let source = controller
            .insert_tab(
                TabDraft::new()
                    .with_url("https://example.com/page")
                    .private(true),
            )
            .unwrap();
        controller
            .add_tab(
                Some(source),
                AddTabOptions {
                    enter_edit_mode: false,
                    ..AddTabOptions::default()
                },
            )
            .unwrap();
        harness.clear_calls();
        source
    }

    fn load(tab_id: TabId) -> ViewEvent {
        ViewEvent::DidFinishLoad { tab_id }
    }

    fn scroll_writes(harness: &Harness) -> Vec<(TabId, f64)> {
        harness
            .host
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Script(tab_id, Script::ScrollTo { y }) => Some((tab_id, y)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_copies_attributes_and_scroll() {
        let harness = Harness::on_current_runtime(Config::default());
        let source = private_source(&harness);
        harness.host.set_scroll_y(Some(420.0));

        let copy = harness.controller.duplicate_tab(&source).unwrap();
        assert_ne!(copy, source);

        let original = harness.controller.tab(&source).unwrap();
        let duplicate = harness.controller.tab(&copy).unwrap();
        assert_eq!(duplicate.url.as_deref(), Some("https://example.com/page"));
        assert!(duplicate.private);
        assert_eq!(duplicate.url, original.url);

        // The copy is shown without address editing
        assert_eq!(harness.controller.selected_tab(), Some(copy));
        assert!(harness.host.calls().contains(&HostCall::Select(copy, true)));
        assert!(harness.strip.edit_mode_entries().is_empty());

        // Let the offset query resolve
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Loads of other views are ignored
        harness.controller.events().emit(&load(source));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(scroll_writes(&harness).is_empty());

        harness.controller.events().emit(&load(copy));
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(
            scroll_writes(&harness),
            vec![(copy, 420.0), (copy, 420.0), (copy, 420.0)]
        );
        assert_eq!(harness.controller.events().count(EventKind::DidFinishLoad), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_writes_follow_schedule() {
        let harness = Harness::on_current_runtime(Config::default());
        let source = private_source(&harness);
        harness.host.set_scroll_y(Some(80.0));

        let copy = harness.controller.duplicate_tab(&source).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        harness.controller.events().emit(&load(copy));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scroll_writes(&harness).len(), 1);

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(scroll_writes(&harness).len(), 2);

        tokio::time::sleep(Duration::from_millis(750)).await;
        assert_eq!(scroll_writes(&harness).len(), 3);

        // A reload of the copy does not schedule more writes
        harness.controller.events().emit(&load(copy));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(scroll_writes(&harness).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_offset_defaults_to_zero() {
        let harness = Harness::on_current_runtime(Config::default());
        let source = private_source(&harness);
        harness.host.set_scroll_y(None);

        let copy = harness.controller.duplicate_tab(&source).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        harness.controller.events().emit(&load(copy));
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(scroll_writes(&harness), vec![(copy, 0.0); 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_released_when_copy_never_loads() {
        let harness = Harness::on_current_runtime(Config::default());
        let source = private_source(&harness);

        harness.controller.duplicate_tab(&source).unwrap();
        assert_eq!(harness.controller.events().count(EventKind::DidFinishLoad), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(harness.controller.events().count(EventKind::DidFinishLoad), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_kept_without_timeout() {
        let config = Config {
            duplicate_listener_timeout_ms: None,
            ..Config::default()
        };
        let harness = Harness::on_current_runtime(config);
        let source = private_source(&harness);

        let copy = harness.controller.duplicate_tab(&source).unwrap();
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(harness.controller.events().count(EventKind::DidFinishLoad), 1);

        harness.controller.events().emit(&load(copy));
        assert_eq!(harness.controller.events().count(EventKind::DidFinishLoad), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_unknown_tab() {
        let harness = Harness::on_current_runtime(Config::default());
        let before = harness.controller.with_tasks(|tasks| tasks.selected_tabs().unwrap().len());

        assert!(matches!(
            harness.controller.duplicate_tab(&TabId::new()),
            Err(CoreError::TabNotFound(_))
        ));
        assert_eq!(
            harness.controller.with_tasks(|tasks| tasks.selected_tabs().unwrap().len()),
            before
        );
        assert!(harness.controller.events().is_empty());
    }
}
