//! View event bus
//!
//! The content host emits events for every view here; listeners subscribe by
//! event kind and keep the returned [`SubscriptionId`] to unsubscribe later.
//! A handler can also drop itself by returning [`Listen::Stop`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use taskshell_tabs::TabId;

/// IPC channel a page uses to ask for its own tab to be closed
pub const CLOSE_WINDOW_CHANNEL: &str = "close-window";

/// How the page asked for a new window to be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Default,
    ForegroundTab,
    BackgroundTab,
    NewWindow,
    NewPopup,
    Other(String),
}

impl From<&str> for Disposition {
    fn from(hint: &str) -> Self {
        match hint {
            "default" => Disposition::Default,
            "foreground-tab" => Disposition::ForegroundTab,
            "background-tab" => Disposition::BackgroundTab,
            "new-window" => Disposition::NewWindow,
            "new-popup" => Disposition::NewPopup,
            other => Disposition::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DidFinishLoad,
    NewWindow,
    Ipc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The view finished loading its page
    DidFinishLoad { tab_id: TabId },
    /// The page asked to open a new window
    NewWindow {
        tab_id: TabId,
        url: String,
        frame_name: Option<String>,
        disposition: Disposition,
    },
    /// A message sent by the page over an IPC channel
    Ipc {
        tab_id: TabId,
        channel: String,
        args: serde_json::Value,
    },
}

impl ViewEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ViewEvent::DidFinishLoad { .. } => EventKind::DidFinishLoad,
            ViewEvent::NewWindow { .. } => EventKind::NewWindow,
            ViewEvent::Ipc { .. } => EventKind::Ipc,
        }
    }

    /// The tab whose view emitted the event
    pub fn tab_id(&self) -> TabId {
        match self {
            ViewEvent::DidFinishLoad { tab_id }
            | ViewEvent::NewWindow { tab_id, .. }
            | ViewEvent::Ipc { tab_id, .. } => *tab_id,
        }
    }
}

/// What a handler wants after seeing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listen {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&ViewEvent) -> Listen + Send + Sync>;

struct Binding {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventHub {
    next_id: AtomicU64,
    bindings: RwLock<Vec<Binding>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event of `kind`, from any view
    pub fn bind<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&ViewEvent) -> Listen + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.bindings.write().push(Binding {
            id,
            kind,
            handler: Arc::new(handler),
        });

        tracing::trace!(subscription = id.0, ?kind, "Bound view event handler");

        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unbind(&self, id: SubscriptionId) -> bool {
        let mut bindings = self.bindings.write();
        let before = bindings.len();
        bindings.retain(|b| b.id != id);
        before != bindings.len()
    }

    fn is_bound(&self, id: SubscriptionId) -> bool {
        self.bindings.read().iter().any(|b| b.id == id)
    }

    /// Number of live subscriptions for an event kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.bindings.read().iter().filter(|b| b.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Deliver an event to every matching handler, returning how many ran.
    ///
    /// Handlers run without the registry lock held, so they may bind, unbind
    /// or emit further events.
    pub fn emit(&self, event: &ViewEvent) -> usize {
        let kind = event.kind();
        let matching: Vec<(SubscriptionId, Handler)> = self
            .bindings
            .read()
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| (b.id, Arc::clone(&b.handler)))
            .collect();

        let mut delivered = 0;
        for (id, handler) in matching {
            // An earlier handler may have unbound this one
            if !self.is_bound(id) {
                continue;
            }

            delivered += 1;
            if handler(event) == Listen::Stop {
                self.unbind(id);
            }
        }

        delivered
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("bindings", &self.len())
            .finish()
    }
}
