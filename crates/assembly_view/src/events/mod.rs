//! View event system
//!
//! Views queue typed [`ViewEvent`]s as they change state. Handlers register
//! for an [`EventType`]; dispatch hands each queued event to the handlers of
//! its type in registration order, stopping at the first handler that
//! consumes it.

use crate::document::DocumentId;
use crate::foundation::bounds::BoundingBox;
use crate::view::{SelectionChanged, VisibilityChange};
use std::collections::HashMap;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Aggregate box of a document's renderables changed
    GraphicsBoundingBoxChanged,
    /// A batch of node visibility states changed
    NodesVisibilityChanged,
    /// Application selection changed
    SelectionChanged,
}

/// Notification emitted by document views and the session
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// New aggregate box after an entity was mapped or unmapped
    GraphicsBoundingBoxChanged {
        /// Emitting document
        document: DocumentId,
        /// Box of every mapped entity of the document
        bbox: BoundingBox,
    },
    /// One `set_node_visible` call
    NodesVisibilityChanged {
        /// Emitting document
        document: DocumentId,
        /// Changed nodes with their new states
        change: VisibilityChange,
    },
    /// Selection model update
    SelectionChanged(SelectionChanged),
}

impl ViewEvent {
    /// Type of this event
    pub fn event_type(&self) -> EventType {
        match self {
            Self::GraphicsBoundingBoxChanged { .. } => EventType::GraphicsBoundingBoxChanged,
            Self::NodesVisibilityChanged { .. } => EventType::NodesVisibilityChanged,
            Self::SelectionChanged(_) => EventType::SelectionChanged,
        }
    }
}

/// Event handler trait
///
/// Returns true if the event was consumed, which stops forwarding.
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &ViewEvent) -> bool;
}

/// Event queue with per-type handler registration
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<ViewEvent>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event
    pub fn send(&mut self, event: ViewEvent) {
        self.queue.push(event);
    }

    /// Queued events, oldest first
    pub fn pending(&self) -> &[ViewEvent] {
        &self.queue
    }

    /// Deliver every queued event to its handlers and return the events
    pub fn dispatch(&mut self) -> Vec<ViewEvent> {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(event) {
                        break;
                    }
                }
            }
        }
        events
    }

    /// Drop all queued events
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("queue", &self.queue)
            .field("handler_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SelectionSync;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<EventType>>>,
        consume: bool,
    }

    impl EventHandler for Recorder {
        fn on_event(&mut self, event: &ViewEvent) -> bool {
            self.seen.borrow_mut().push(event.event_type());
            self.consume
        }
    }

    fn bbox_event() -> ViewEvent {
        ViewEvent::GraphicsBoundingBoxChanged {
            document: DocumentId(1),
            bbox: BoundingBox::void(),
        }
    }

    #[test]
    fn test_dispatch_by_type() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();
        system.register_handler(
            EventType::SelectionChanged,
            Box::new(Recorder { seen: Rc::clone(&seen), consume: false }),
        );

        system.send(bbox_event());
        system.send(ViewEvent::SelectionChanged(SelectionChanged {
            added: Vec::new(),
            removed: Vec::new(),
            sync: SelectionSync::Propagate,
        }));
        assert_eq!(system.pending().len(), 2);

        let dispatched = system.dispatch();
        assert_eq!(dispatched.len(), 2);
        assert_eq!(*seen.borrow(), vec![EventType::SelectionChanged]);
        assert!(system.pending().is_empty());
    }

    #[test]
    fn test_consumed_event_stops_forwarding() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut system = EventSystem::new();
        let kind = EventType::GraphicsBoundingBoxChanged;
        system.register_handler(kind, Box::new(Recorder { seen: Rc::clone(&first), consume: true }));
        system.register_handler(kind, Box::new(Recorder { seen: Rc::clone(&second), consume: false }));

        system.send(bbox_event());
        system.dispatch();
        assert_eq!(first.borrow().len(), 1);
        assert!(second.borrow().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut system = EventSystem::new();
        system.send(bbox_event());
        system.clear();
        assert!(system.dispatch().is_empty());
    }
}
