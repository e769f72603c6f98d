//! Insertion-ordered listener registry with disposable subscriptions.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Slots<T: ?Sized> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Registry of callbacks notified synchronously, in subscription order
pub struct Observers<T: ?Sized> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T: ?Sized + 'static> Observers<T> {
    pub fn new() -> Self {
        Observers {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. The returned handle removes it again.
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        slots.listeners.push((id, listener));

        let weak: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Subscription {
            dispose: Some(Box::new(move || {
                if let Some(slots) = weak.upgrade() {
                    slots.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    /// Call every listener with `value`.
    ///
    /// The listener list is snapshotted first, so a listener may subscribe or
    /// unsubscribe while being notified. Changes take effect on the next call.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .slots
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();

        for listener in snapshot {
            // A listener that re-enters its own notification is skipped
            if let Ok(mut callback) = listener.try_borrow_mut() {
                callback(value);
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.borrow().listeners.len()
    }
}

/// Handle returned by `subscribe`
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the listener. Safe to call after the registry is gone.
    pub fn unsubscribe(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notifies_in_subscription_order() {
        let observers: Observers<str> = Observers::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            let _ = observers.subscribe(move |msg: &str| {
                log.borrow_mut().push(format!("{name}:{msg}"));
            });
        }
        observers.notify("ping");

        assert_eq!(
            *log.borrow(),
            vec!["first:ping", "second:ping", "third:ping"]
        );
    }

    #[test]
    fn test_unsubscribe_removes_only_that_listener() {
        let observers: Observers<u32> = Observers::new();
        let a = Rc::new(Cell::new(0u32));
        let b = Rc::new(Cell::new(0u32));

        let a_clone = Rc::clone(&a);
        let sub_a = observers.subscribe(move |v| a_clone.set(a_clone.get() + v));
        let b_clone = Rc::clone(&b);
        let _sub_b = observers.subscribe(move |v| b_clone.set(b_clone.get() + v));

        observers.notify(&1);
        sub_a.unsubscribe();
        observers.notify(&10);

        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 11);
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn test_unsubscribe_during_notify() {
        let observers: Observers<u32> = Observers::new();
        let holder: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let holder_clone = Rc::clone(&holder);
        let calls_clone = Rc::clone(&calls);
        let sub = observers.subscribe(move |_| {
            calls_clone.set(calls_clone.get() + 1);
            if let Some(sub) = holder_clone.borrow_mut().take() {
                sub.unsubscribe();
            }
        });
        *holder.borrow_mut() = Some(sub);

        observers.notify(&0);
        observers.notify(&0);
        assert_eq!(calls.get(), 1);
        assert_eq!(observers.len(), 0);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let observers: Observers<u32> = Observers::new();
        let sub = observers.subscribe(|_| {});
        drop(observers);
        sub.unsubscribe();
    }
}
