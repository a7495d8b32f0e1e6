use callmap_core::NodeId;
use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivationOrigin {
    Graph,
    Sidebar,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Graph interaction
    HighlightNode {
        id: NodeId,
    },
    ResetHighlight,
    /// Center the view on a node; function nodes also open their details.
    RecenterNode {
        id: NodeId,
        origin: ActivationOrigin,
    },

    // Detail overlay
    ShowFunctionDetail {
        folder: String,
        name: String,
    },
    CloseDetail,

    // Sidebar
    SearchChanged {
        query: String,
    },

    // Layout
    ViewportResized {
        width: f32,
        height: f32,
    },
    LayoutStopped {
        ticks: u64,
    },

    // Loading
    MappingLoaded {
        nodes: usize,
        edges: usize,
    },
    MappingFailed {
        error: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        tracing::trace!("Publishing {:?}", event);
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// Called once per frame from the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
