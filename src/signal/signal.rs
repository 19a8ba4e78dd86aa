use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

type Subscriber<T> = Arc<dyn Fn(T) + Send + Sync>;

struct SignalInner<T> {
    value: watch::Sender<T>,
    subscribers: RwLock<Vec<(usize, Subscriber<T>)>>,
    next_subscriber: AtomicUsize,
}

/// A reactive value that notifies subscribers when it changes.
///
/// Holds exactly one current value. Writes that leave the value unchanged do
/// not notify anyone.
///
/// # Examples
///
/// ```
/// use counterplus::Signal;
/// use std::sync::{Arc, Mutex};
///
/// let count = Signal::new(0);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let _guard = count.watch({
///     let seen = seen.clone();
///     move |value| seen.lock().unwrap().push(value)
/// });
///
/// count.set(1);
/// count.set(1);
/// count.update(|n| *n += 1);
///
/// assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
/// ```
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

/// Read-only view of a [`Signal`].
///
/// Handed out to observers that must not write the value.
pub struct ReadSignal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(initial: T) -> Self {
        let (value, _) = watch::channel(initial);
        Self {
            inner: Arc::new(SignalInner {
                value,
                subscribers: RwLock::new(Vec::new()),
                next_subscriber: AtomicUsize::new(0),
            }),
        }
    }

    /// Get the current value of the signal.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Set a new value, notifying subscribers if it differs from the current one.
    pub fn set(&self, new_value: T) {
        self.update(|value| *value = new_value);
    }

    /// Update the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        if self.apply(f) {
            self.notify();
        }
    }

    /// Mutate the value without running callbacks.
    ///
    /// Returns whether the value changed. Async receivers are woken, callback
    /// subscribers wait for a matching [`Signal::notify`].
    pub(crate) fn apply(&self, f: impl FnOnce(&mut T)) -> bool {
        self.inner.value.send_if_modified(|value| {
            let before = value.clone();
            f(value);
            *value != before
        })
    }

    /// Push the current value to every callback subscriber.
    pub(crate) fn notify(&self) {
        self.inner.notify();
    }

    /// Subscribe to this signal. See [`ReadSignal::watch`].
    pub fn watch<F>(&self, callback: F) -> WatchGuard
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        watch_inner(&self.inner, callback)
    }

    /// Async receiver for this signal. See [`ReadSignal::changes`].
    pub fn changes(&self) -> watch::Receiver<T> {
        self.inner.changes()
    }

    /// Read-only view sharing this signal's value.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of live callback subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Create a derived signal by applying a function to this signal's value.
    ///
    /// The derived signal stays in sync for as long as the returned guard is held.
    pub fn map<U, F>(&self, f: F) -> (ReadSignal<U>, WatchGuard)
    where
        U: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let derived = Signal::new(self.with(&f));
        let target = derived.clone();
        let guard = self.watch(move |value| target.set(f(&value)));
        (derived.read_only(), guard)
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> ReadSignal<T> {
    /// Get the current value of the signal.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Watch this signal for changes.
    ///
    /// The callback runs immediately with the current value, then once per
    /// change with the latest value. Dropping the guard unsubscribes.
    pub fn watch<F>(&self, callback: F) -> WatchGuard
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        watch_inner(&self.inner, callback)
    }

    /// Async receiver for this signal.
    ///
    /// The receiver starts marked as changed, so the first `changed().await`
    /// resolves immediately with the current value.
    pub fn changes(&self) -> watch::Receiver<T> {
        self.inner.changes()
    }
}

impl<T: Clone> SignalInner<T> {
    fn get(&self) -> T {
        self.value.borrow().clone()
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    fn changes(&self) -> watch::Receiver<T> {
        let mut receiver = self.value.subscribe();
        receiver.mark_changed();
        receiver
    }

    fn notify(&self) {
        // Snapshot the list so callbacks may subscribe, unsubscribe or write.
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in subscribers {
            callback(self.get());
        }
    }
}

fn watch_inner<T, F>(inner: &Arc<SignalInner<T>>, callback: F) -> WatchGuard
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    let id = inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
    let callback: Subscriber<T> = Arc::new(callback);
    inner.subscribers.write().push((id, Arc::clone(&callback)));

    // Call immediately with current value
    callback(inner.get());

    let weak: Weak<SignalInner<T>> = Arc::downgrade(inner);
    WatchGuard {
        unsubscribe: Some(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.write().retain(|(sub, _)| *sub != id);
            }
        })),
    }
}

/// RAII guard for signal watchers.
#[must_use = "dropping the guard unsubscribes immediately"]
pub struct WatchGuard {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
