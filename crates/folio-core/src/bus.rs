//! Topic-based publish/subscribe
//!
//! Publishers and subscribers only share a topic name. Dispatch is
//! synchronous and runs on the caller's stack.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared subscriber callback
///
/// Identity is the `Rc` allocation: registering a clone of the same `Rc`
/// twice is a no-op, and `off` must be given a clone of the registered `Rc`.
pub type Subscriber<P> = Rc<dyn Fn(&P)>;

/// Wrap a closure as a [`Subscriber`]
pub fn subscriber<P, F>(f: F) -> Subscriber<P>
where
    F: Fn(&P) + 'static,
{
    Rc::new(f)
}

/// Message bus keyed by topic name
///
/// Owned by the composition root and shared by `Rc`. Every operation is a
/// no-op on unknown topics; nothing here fails.
pub struct MessageBus<P> {
    topics: RefCell<HashMap<String, Vec<Subscriber<P>>>>,
}

impl<P> Default for MessageBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> MessageBus<P> {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            topics: RefCell::new(HashMap::new()),
        }
    }

    /// Register `subscriber` under `topic`
    pub fn on(&self, topic: &str, subscriber: Subscriber<P>) {
        let mut topics = self.topics.borrow_mut();
        let list = topics.entry(topic.to_string()).or_default();
        if list.iter().any(|s| Rc::ptr_eq(s, &subscriber)) {
            return;
        }
        list.push(subscriber);
    }

    /// Remove the first occurrence of `subscriber` from `topic`
    ///
    /// Removal takes effect immediately. Returns `false` when nothing matched.
    pub fn off(&self, topic: &str, subscriber: &Subscriber<P>) -> bool {
        let mut topics = self.topics.borrow_mut();
        let list = match topics.get_mut(topic) {
            Some(list) => list,
            None => return false,
        };
        match list.iter().position(|s| Rc::ptr_eq(s, subscriber)) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver `payload` to every subscriber of `topic` in registration order
    ///
    /// The subscriber list is snapshotted first, so `on`/`off` calls made by
    /// a subscriber apply from the next `send`. Nested sends are fine.
    pub fn send(&self, topic: &str, payload: P) {
        let snapshot: Vec<Subscriber<P>> = match self.topics.borrow().get(topic) {
            Some(list) => list.clone(),
            None => return,
        };
        for subscriber in snapshot {
            subscriber(&payload);
        }
    }

    /// Number of subscribers registered under `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.borrow().get(topic).map(Vec::len).unwrap_or(0)
    }

    /// Check if `topic` has at least one subscriber
    #[inline]
    pub fn has_subscribers(&self, topic: &str) -> bool {
        self.subscriber_count(topic) > 0
    }

    /// Topics that have ever been subscribed to, sorted
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}
