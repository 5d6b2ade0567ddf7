//! Build-once cells for derived semantic facts.
//!
//! Two flavours:
//!
//! - [`Memo`] computes outside any lock and publishes the first value
//!   written. Computations may force other memos (including, through a
//!   cycle, their own element's) without deadlocking; a losing racer's value
//!   is dropped.
//! - [`DelayLoaded`] holds a one-shot loader that runs exactly once under a
//!   lock. Callers that arrive while it runs block, then read the stored
//!   value.

use std::fmt;
use std::sync::OnceLock;

use parking_lot::Mutex;

/// A compute-on-demand slot. The first published value is returned forever.
pub struct Memo<T> {
    cell: OnceLock<T>,
}

impl<T> Memo<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached value, computing it if the slot is empty.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        if let Some(value) = self.cell.get() {
            return value;
        }
        let value = compute();
        self.cell.get_or_init(|| value)
    }

    /// The cached value, if already computed.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<pending>)"),
        }
    }
}

type Loader<T> = Box<dyn FnOnce() -> T + Send>;

/// A value produced by a loader that runs at most once.
pub struct DelayLoaded<T> {
    loader: Mutex<Option<Loader<T>>>,
    value: OnceLock<T>,
}

impl<T> DelayLoaded<T> {
    pub fn new(loader: impl FnOnce() -> T + Send + 'static) -> Self {
        Self {
            loader: Mutex::new(Some(Box::new(loader))),
            value: OnceLock::new(),
        }
    }

    /// A slot that is already loaded.
    pub fn loaded(value: T) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            loader: Mutex::new(None),
            value: cell,
        }
    }

    pub fn get(&self) -> &T
    where
        T: Default,
    {
        if let Some(value) = self.value.get() {
            return value;
        }
        let mut loader = self.loader.lock();
        if let Some(value) = self.value.get() {
            return value;
        }
        // Taking the loader out drops its captures once it has run.
        let value = match loader.take() {
            Some(load) => load(),
            None => T::default(),
        };
        let value = self.value.get_or_init(|| value);
        drop(loader);
        value
    }

    pub fn is_loaded(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for DelayLoaded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => f.debug_tuple("DelayLoaded").field(value).finish(),
            None => f.write_str("DelayLoaded(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_memo_computes_once() {
        let memo = Memo::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let value = memo.get_or_compute(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            });
            assert_eq!(*value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(memo.is_computed());
    }

    #[test]
    fn test_memo_first_write_wins() {
        let memo = Memo::new();
        let outer = memo.get_or_compute(|| {
            // A nested force publishes first.
            assert_eq!(*memo.get_or_compute(|| 1), 1);
            2
        });
        assert_eq!(*outer, 1);
    }

    #[test]
    fn test_delay_loaded_runs_loader_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let slot = Arc::new(DelayLoaded::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(10));
            vec![1, 2, 3]
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || slot.get().clone())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec![1, 2, 3]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_loaded_already_loaded() {
        let slot = DelayLoaded::loaded(String::from("x"));
        assert!(slot.is_loaded());
        assert_eq!(slot.get(), "x");
    }
}
