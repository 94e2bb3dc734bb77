//! In-process observer registry for store events
//!
//! Listeners are keyed by event name and called synchronously, in
//! registration order, from inside the emitting call. A listener that
//! returns an error or panics is logged and skipped; the remaining
//! listeners still run.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::{debug, error};

use crate::domain::error::Result;
use crate::domain::event::AppStateEvent;

type Handler = Rc<dyn Fn(&AppStateEvent) -> Result<()>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<String, Vec<(u64, Handler)>>,
}

impl Registry {
    fn remove(&mut self, event_type: &str, id: u64) -> bool {
        let Some(handlers) = self.listeners.get_mut(event_type) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.listeners.remove(event_type);
        }
        removed
    }

    fn contains(&self, event_type: &str, id: u64) -> bool {
        self.listeners
            .get(event_type)
            .is_some_and(|handlers| handlers.iter().any(|(handler_id, _)| *handler_id == id))
    }
}

/// Publish/subscribe registry shared with the unsubscribe closures it hands out
#[derive(Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `event_type`
    ///
    /// Returns a closure that removes exactly this handler. Calling it again,
    /// or after the bus is dropped, does nothing.
    pub fn subscribe<F>(&self, event_type: &str, handler: F) -> impl Fn() + 'static
    where
        F: Fn(&AppStateEvent) -> Result<()> + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .listeners
                .entry(event_type.to_string())
                .or_default()
                .push((id, Rc::new(handler)));
            id
        };
        debug!(event = event_type, id, "Registered event listener");

        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
        let event_type = event_type.to_string();
        move || {
            if let Some(registry) = registry.upgrade() {
                if registry.borrow_mut().remove(&event_type, id) {
                    debug!(event = %event_type, id, "Removed event listener");
                }
            }
        }
    }

    /// Deliver `event` to every listener registered for its type
    pub fn emit(&self, event: &AppStateEvent) {
        let key = event.event_type.as_str();

        // Snapshot so listeners may subscribe or unsubscribe while we dispatch
        let handlers: Vec<(u64, Handler)> = match self.registry.borrow().listeners.get(key) {
            Some(handlers) => handlers
                .iter()
                .map(|(id, handler)| (*id, Rc::clone(handler)))
                .collect(),
            None => return,
        };

        for (id, handler) in handlers {
            // A sibling may have removed this listener during dispatch
            if !self.registry.borrow().contains(key, id) {
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(event = key, id, error = %err, "Error in event handler");
                }
                Err(payload) => {
                    error!(
                        event = key,
                        id,
                        panic = %panic_message(payload.as_ref()),
                        "Event handler panicked"
                    );
                }
            }
        }
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Listener counts per event name, sorted by name
    pub fn listener_summary(&self) -> Vec<(String, usize)> {
        let mut summary: Vec<(String, usize)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(name, handlers)| (name.clone(), handlers.len()))
            .collect();
        summary.sort();
        summary
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::event::{EventPayload, EventType};
    use std::cell::Cell;

    fn event(event_type: EventType) -> AppStateEvent {
        AppStateEvent::new(event_type, EventPayload::Empty {})
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for n in 0..3 {
            let seen = Rc::clone(&seen);
            let _unsubscribe = bus.subscribe("app:reset", move |_| {
                seen.borrow_mut().push(n);
                Ok(())
            });
        }
        bus.emit(&event(EventType::AppReset));

        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_is_exact_and_idempotent() {
        let bus = EventBus::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = Rc::clone(&first);
        let unsubscribe_first = bus.subscribe("file:parsed", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        let counter = Rc::clone(&second);
        let _keep = bus.subscribe("file:parsed", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        bus.emit(&event(EventType::FileParsed));
        unsubscribe_first();
        unsubscribe_first();
        bus.emit(&event(EventType::FileParsed));

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
        assert_eq!(bus.listener_count("file:parsed"), 1);
    }

    #[test]
    fn test_empty_listener_sets_are_dropped() {
        let bus = EventBus::new();
        let unsubscribe = bus.subscribe("qr:validated", |_| Ok(()));
        assert_eq!(bus.listener_summary(), vec![("qr:validated".to_string(), 1)]);

        unsubscribe();
        assert!(bus.listener_summary().is_empty());
    }

    #[test]
    fn test_failing_handlers_do_not_stop_siblings() {
        let bus = EventBus::new();
        let reached = Rc::new(Cell::new(false));

        let _err = bus.subscribe("app:reset", |_| Err(AppError::Internal("boom".to_string())));
        let _panic = bus.subscribe("app:reset", |_| panic!("handler exploded"));
        let flag = Rc::clone(&reached);
        let _ok = bus.subscribe("app:reset", move |_| {
            flag.set(true);
            Ok(())
        });

        bus.emit(&event(EventType::AppReset));
        assert!(reached.get());
    }

    #[test]
    fn test_handler_removed_mid_dispatch_is_skipped() {
        let bus = EventBus::new();
        let later_ran = Rc::new(Cell::new(false));
        let slot: Rc<RefCell<Option<Box<dyn Fn()>>>> = Rc::new(RefCell::new(None));

        let remover = Rc::clone(&slot);
        let _first = bus.subscribe("app:reset", move |_| {
            if let Some(unsubscribe) = remover.borrow().as_ref() {
                unsubscribe();
            }
            Ok(())
        });
        let flag = Rc::clone(&later_ran);
        let unsubscribe_second = bus.subscribe("app:reset", move |_| {
            flag.set(true);
            Ok(())
        });
        *slot.borrow_mut() = Some(Box::new(unsubscribe_second));

        bus.emit(&event(EventType::AppReset));
        assert!(!later_ran.get());
    }

    #[test]
    fn test_unsubscribe_after_drop_is_noop() {
        let bus = EventBus::new();
        let unsubscribe = bus.subscribe("app:reset", |_| Ok(()));
        drop(bus);
        unsubscribe();
    }
}
