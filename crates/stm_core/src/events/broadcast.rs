//! Generic synchronous broadcast channel.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Subscribers<T> {
    next_id: Cell<u64>,
    // BTreeMap keeps delivery in subscription order.
    handlers: RefCell<BTreeMap<u64, Handler<T>>>,
}

impl<T> Subscribers<T> {
    fn remove(&self, id: u64) -> bool {
        self.handlers.borrow_mut().remove(&id).is_some()
    }

    fn contains(&self, id: u64) -> bool {
        self.handlers.borrow().contains_key(&id)
    }
}

/// Hot multicast stream of `T` values.
///
/// Clones share the same subscriber registry, so any clone can emit to all
/// subscribers. Late subscribers do not receive earlier emissions.
pub struct Broadcast<T> {
    inner: Rc<Subscribers<T>>,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Broadcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Broadcast<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Subscribers {
                next_id: Cell::new(0),
                handlers: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// Registers `handler` for every later emission.
    ///
    /// The handler stays registered until the returned handle is cancelled or
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .handlers
            .borrow_mut()
            .insert(id, Rc::new(handler));

        let weak: Weak<Subscribers<T>> = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                weak.upgrade().is_some_and(|inner| inner.remove(id))
            })),
        }
    }

    /// Delivers `value` to every current subscriber in subscription order.
    ///
    /// Handlers may subscribe, cancel or emit again while being called; the
    /// registry is never borrowed across a handler call.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(u64, Handler<T>)> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .map(|(id, handler)| (*id, Rc::clone(handler)))
            .collect();

        for (id, handler) in snapshot {
            if self.inner.contains(id) {
                handler(value);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

/// Cancellation handle for one subscription.
///
/// Cancelling is idempotent and also happens on drop.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() -> bool>>,
}

impl Subscription {
    /// Unsubscribes now. Returns `false` when the handler was already gone.
    pub fn cancel(mut self) -> bool {
        self.release_now()
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) -> bool {
        match self.release.take() {
            Some(release) => release(),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Scoped acquisition of subscriptions that are released together.
#[derive(Debug, Default)]
pub struct SubscriptionScope {
    subscriptions: Vec<Subscription>,
    released: bool,
}

impl SubscriptionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscription to the scope.
    ///
    /// A scope that was already released cancels `subscription` right away.
    pub fn hold(&mut self, subscription: Subscription) {
        if self.released {
            subscription.cancel();
            return;
        }
        self.subscriptions.push(subscription);
    }

    /// Cancels every held subscription. Returns how many were cancelled.
    pub fn release_all(&mut self) -> usize {
        self.released = true;
        self.subscriptions
            .drain(..)
            .map(Subscription::cancel)
            .filter(|cancelled| *cancelled)
            .count()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}
