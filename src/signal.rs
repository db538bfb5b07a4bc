//! A single-value observable cell.
//!
//! Setting the value notifies every subscriber with the new and previous
//! values. There is no implicit dependency tracking: subscribers are
//! registered and removed explicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Callback<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
    once: bool,
}

struct Inner<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<Subscriber<T>>>,
    next_id: AtomicU64,
}

/// Handle returned by [`Signal::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// An observable value. Clones share the same cell.
///
/// ```rust
/// use pathway::Signal;
/// use std::sync::{Arc, Mutex};
///
/// let count = Signal::new(0);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = seen.clone();
/// let off = count.on(move |value, last| log.lock().unwrap().push((*last, *value)));
///
/// count.set(2);
/// count.off(off);
/// count.set(3);
///
/// assert_eq!(count.get(), 3);
/// assert_eq!(*seen.lock().unwrap(), vec![(0, 2)]);
/// ```
pub struct Signal<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal {
            inner: self.inner.clone(),
        }
    }
}

// Subscribers never run while a lock is held, so a poisoned lock only means
// a subscriber panicked elsewhere; the data is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone> Signal<T> {
    pub fn new(value: T) -> Self {
        Signal {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        lock(&self.inner.value).clone()
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T) {
        let last = std::mem::replace(&mut *lock(&self.inner.value), value.clone());

        let callbacks: Vec<Callback<T>> = {
            let mut subscribers = lock(&self.inner.subscribers);
            let callbacks = subscribers.iter().map(|s| s.callback.clone()).collect();
            subscribers.retain(|s| !s.once);
            callbacks
        };

        for callback in callbacks {
            callback(&value, &last);
        }
    }

    /// Subscribes to every change.
    pub fn on<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(f), false)
    }

    /// Subscribes to the next change only.
    pub fn once<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(f), true)
    }

    fn subscribe(&self, callback: Callback<T>, once: bool) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.subscribers).push(Subscriber { id, callback, once });
        Subscription(id)
    }

    /// Removes a subscriber. Returns `false` if it was already gone.
    pub fn off(&self, subscription: Subscription) -> bool {
        let mut subscribers = lock(&self.inner.subscribers);
        let before = subscribers.len();
        subscribers.retain(|s| s.id != subscription.0);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn once_fires_once() {
        let signal = Signal::new("a".to_string());
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        signal.once(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        signal.set("b".into());
        signal.set("c".into());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn off_is_idempotent() {
        let signal = Signal::new(1);
        let sub = signal.on(|_, _| {});

        assert!(signal.off(sub));
        assert!(!signal.off(sub));
    }

    #[test]
    fn subscriber_can_read_the_signal() {
        let signal = Signal::new(1);
        let seen = Arc::new(Mutex::new(None));

        let (inner, out) = (signal.clone(), seen.clone());
        signal.on(move |value, _| {
            *out.lock().unwrap() = Some((*value, inner.get()));
        });

        signal.set(5);
        assert_eq!(*seen.lock().unwrap(), Some((5, 5)));
    }
}
