//! Publish/subscribe cell for state snapshots.
//!
//! Subscribers are called with the current value on subscribe and with a
//! full snapshot after every mutation. Every mutation is stamped with a
//! version and queued while the value lock is held; one thread at a time
//! drains the queue, so each subscriber sees snapshots in mutation order.
//! Callbacks run with no lock held and may read or mutate the cell. A
//! mutation made while another thread is draining is delivered by that
//! thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
    /// Version of the last snapshot handed to `callback`.
    seen: AtomicU64,
}

struct Versioned<T> {
    value: T,
    version: u64,
}

struct Delivery<T> {
    version: u64,
    snapshot: T,
    /// Only this subscriber, for the initial call on subscribe.
    target: Option<u64>,
}

struct Outbox<T> {
    queue: VecDeque<Delivery<T>>,
    draining: bool,
}

struct Inner<T> {
    value: Mutex<Versioned<T>>,
    subscribers: Mutex<Vec<Arc<Subscriber<T>>>>,
    outbox: Mutex<Outbox<T>>,
    next_id: AtomicU64,
}

/// Shared observable value. Clones refer to the same cell.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(Versioned { value, version: 1 }),
                subscribers: Mutex::new(Vec::new()),
                outbox: Mutex::new(Outbox {
                    queue: VecDeque::new(),
                    draining: false,
                }),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.lock().value.clone()
    }

    pub fn set(&self, value: T) {
        let mut guard = self.inner.value.lock();
        guard.value = value;
        self.commit(&mut guard);
        drop(guard);
        self.drain();
    }

    /// Replace the value with `f(old)` and notify subscribers.
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T
    where
        T: Default,
    {
        let mut guard = self.inner.value.lock();
        let old = std::mem::take(&mut guard.value);
        guard.value = f(old);
        let snapshot = self.commit(&mut guard);
        drop(guard);
        self.drain();
        snapshot
    }

    /// Like [`update`](Self::update), but only when `pred` holds for the
    /// current value. Check and update happen under one lock.
    ///
    /// Returns the new snapshot, or `None` if `pred` rejected the value.
    pub fn update_if(&self, pred: impl FnOnce(&T) -> bool, f: impl FnOnce(T) -> T) -> Option<T>
    where
        T: Default,
    {
        let mut guard = self.inner.value.lock();
        if !pred(&guard.value) {
            return None;
        }
        let old = std::mem::take(&mut guard.value);
        guard.value = f(old);
        let snapshot = self.commit(&mut guard);
        drop(guard);
        self.drain();
        Some(snapshot)
    }

    /// Register `f`. It is called with the current value before any later
    /// snapshot.
    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let current = self.inner.value.lock();
            self.inner.subscribers.lock().push(Arc::new(Subscriber {
                id,
                callback: Arc::new(f),
                // Skips snapshots older than the one it starts from.
                seen: AtomicU64::new(current.version - 1),
            }));
            self.inner.outbox.lock().queue.push_back(Delivery {
                version: current.version,
                snapshot: current.value.clone(),
                target: Some(id),
            });
        }
        self.drain();

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.lock().retain(|sub| sub.id != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// Stamp the new value and queue it. Must run under the value lock so
    /// queue order matches version order.
    fn commit(&self, current: &mut Versioned<T>) -> T {
        current.version += 1;
        let snapshot = current.value.clone();
        self.inner.outbox.lock().queue.push_back(Delivery {
            version: current.version,
            snapshot: snapshot.clone(),
            target: None,
        });
        snapshot
    }

    fn drain(&self) {
        {
            let mut outbox = self.inner.outbox.lock();
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }
        // A panicking callback must not leave the queue without a drainer.
        let _unwind = scopeguard::guard_on_unwind(&self.inner.outbox, |outbox| {
            outbox.lock().draining = false;
        });

        loop {
            let next = {
                let mut outbox = self.inner.outbox.lock();
                match outbox.queue.pop_front() {
                    Some(delivery) => delivery,
                    None => {
                        outbox.draining = false;
                        return;
                    }
                }
            };
            self.deliver(next);
        }
    }

    fn deliver(&self, delivery: Delivery<T>) {
        // Copy the list so callbacks can subscribe or unsubscribe.
        let targets: Vec<Arc<Subscriber<T>>> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .filter(|sub| match delivery.target {
                Some(id) => id == sub.id,
                None => true,
            })
            .map(Arc::clone)
            .collect();
        for sub in targets {
            // Only the draining thread touches `seen`.
            if sub.seen.load(Ordering::Relaxed) >= delivery.version {
                continue;
            }
            sub.seen.store(delivery.version, Ordering::Relaxed);
            (sub.callback)(&delivery.snapshot);
        }
    }
}

/// Handle returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the callback registered for the lifetime of the observable.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
