//! Session loading flag and its observer.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Receives loading flag changes of a session.
///
/// Typically a parent coordinating several sibling sessions. Called
/// synchronously; implementations must not block.
pub trait LoadingObserver: Send + Sync {
    /// Called with the new value of the loading flag.
    fn loading_changed(&self, is_loading: bool);
}

impl<F> LoadingObserver for F
where
    F: Fn(bool) + Send + Sync,
{
    fn loading_changed(&self, is_loading: bool) {
        self(is_loading);
    }
}

#[derive(Debug, Default)]
struct Flags {
    in_flight: usize,
    is_loading: bool,
    shut_down: bool,
}

/// The loading flag of one session.
///
/// The flag is true while at least one loading-relevant operation is in
/// flight. The observer hears every change until [`shutdown`](Self::shutdown),
/// and nothing afterwards. Cheap to clone; clones share state.
///
/// Updates may come from any thread. Each change is delivered before the
/// next one is computed, so the observer sees changes in the order the flag
/// took them. The observer must not call back into the same `LoadingState`.
#[derive(Clone, Default)]
pub struct LoadingState {
    delivery: Arc<Mutex<()>>,
    flags: Arc<Mutex<Flags>>,
    observer: Option<Arc<dyn LoadingObserver>>,
}

impl LoadingState {
    /// Creates a loading state without an observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loading state reporting to `observer`.
    #[must_use]
    pub fn with_observer(observer: Arc<dyn LoadingObserver>) -> Self {
        Self {
            delivery: Arc::default(),
            flags: Arc::default(),
            observer: Some(observer),
        }
    }

    /// Returns the last known value of the flag.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.flags.lock().is_loading
    }

    /// Returns the number of operations currently counted as in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.flags.lock().in_flight
    }

    /// Returns true once the owning session has torn down.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.flags.lock().shut_down
    }

    /// Marks one operation as started. Sets the flag synchronously.
    pub fn begin(&self) {
        let _delivery = self.delivery.lock();
        let changed = {
            let mut flags = self.flags.lock();
            if flags.shut_down {
                return;
            }
            flags.in_flight += 1;
            Self::set_flag(&mut flags, true)
        };
        if changed {
            self.notify(true);
        }
    }

    /// Marks one operation as settled. Clears the flag when none remain.
    pub fn finish(&self) {
        let _delivery = self.delivery.lock();
        let changed = {
            let mut flags = self.flags.lock();
            if flags.shut_down {
                return;
            }
            flags.in_flight = flags.in_flight.saturating_sub(1);
            let still_loading = flags.in_flight > 0;
            Self::set_flag(&mut flags, still_loading)
        };
        if changed {
            self.notify(false);
        }
    }

    /// Reports the current flag to the observer, changed or not.
    ///
    /// Used when a session starts so the observer learns its initial state.
    pub fn publish(&self) {
        let _delivery = self.delivery.lock();
        let current = {
            let flags = self.flags.lock();
            if flags.shut_down {
                return;
            }
            flags.is_loading
        };
        self.notify(current);
    }

    /// Stops all further notifications.
    ///
    /// If the flag was true, the observer hears `false` exactly once. The
    /// flag itself keeps its last known value. Repeated calls do nothing.
    /// Once this returns, no notification is in progress.
    pub fn shutdown(&self) {
        let _delivery = self.delivery.lock();
        let was_loading = {
            let mut flags = self.flags.lock();
            if flags.shut_down {
                return;
            }
            flags.shut_down = true;
            flags.is_loading
        };
        if was_loading {
            self.notify(false);
        }
    }

    fn set_flag(flags: &mut Flags, value: bool) -> bool {
        let changed = flags.is_loading != value;
        flags.is_loading = value;
        changed
    }

    fn notify(&self, is_loading: bool) {
        debug!(is_loading, "Loading state changed");
        if let Some(observer) = &self.observer {
            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                observer.loading_changed(is_loading);
            })) {
                warn!("Loading observer panicked: {:?}", e);
            }
        }
    }
}

impl fmt::Debug for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.flags.lock();
        f.debug_struct("LoadingState")
            .field("is_loading", &flags.is_loading)
            .field("in_flight", &flags.in_flight)
            .field("shut_down", &flags.shut_down)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recording() -> (Arc<Mutex<Vec<bool>>>, LoadingState) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let state = LoadingState::with_observer(Arc::new(move |flag: bool| sink.lock().push(flag)));
        (seen, state)
    }

    #[test]
    fn test_begin_and_finish() {
        let (seen, state) = recording();

        state.begin();
        assert!(state.is_loading());
        state.finish();
        assert!(!state.is_loading());

        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[test]
    fn test_overlapping_operations_keep_flag_set() {
        let (seen, state) = recording();

        state.begin();
        state.begin();
        state.finish();
        assert!(state.is_loading());
        assert_eq!(state.in_flight(), 1);
        state.finish();
        assert!(!state.is_loading());

        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[test]
    fn test_publish_reports_current_value() {
        let (seen, state) = recording();
        state.publish();
        assert_eq!(*seen.lock(), vec![false]);
    }

    #[test]
    fn test_shutdown_while_loading_notifies_false_once() {
        let (seen, state) = recording();

        state.begin();
        state.shutdown();
        state.shutdown();
        state.finish();
        state.begin();
        state.publish();

        assert_eq!(*seen.lock(), vec![true, false]);
        assert!(state.is_loading());
        assert!(state.is_shut_down());
    }

    #[test]
    fn test_shutdown_while_idle_is_silent() {
        let (seen, state) = recording();
        state.shutdown();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_observer_panic_suppressed() {
        let state = LoadingState::with_observer(Arc::new(|_: bool| panic!("observer")));
        state.begin();
        assert!(state.is_loading());
    }

    fn alternates(values: &[bool]) -> bool {
        values.iter().enumerate().all(|(i, value)| *value == (i % 2 == 0))
    }

    #[test]
    fn test_notifications_from_many_threads_stay_ordered() {
        for _ in 0..50 {
            let (seen, state) = recording();

            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let state = state.clone();
                    std::thread::spawn(move || {
                        for _ in 0..200 {
                            state.begin();
                            state.finish();
                        }
                    })
                })
                .collect();
            for worker in workers {
                worker.join().unwrap();
            }

            let values = seen.lock().clone();
            assert!(alternates(&values), "out of order: {values:?}");
            assert_eq!(values.last().copied(), Some(state.is_loading()));
            assert!(!state.is_loading());
            assert_eq!(state.in_flight(), 0);
        }
    }

    #[test]
    fn test_nothing_delivered_after_shutdown_returns() {
        for _ in 0..50 {
            let (seen, state) = recording();

            let workers: Vec<_> = (0..4)
                .map(|_| {
                    let state = state.clone();
                    std::thread::spawn(move || {
                        for _ in 0..200 {
                            state.begin();
                            state.finish();
                        }
                    })
                })
                .collect();

            std::thread::yield_now();
            state.shutdown();
            let at_shutdown = seen.lock().len();

            for worker in workers {
                worker.join().unwrap();
            }

            let values = seen.lock().clone();
            assert_eq!(values.len(), at_shutdown);
            assert!(alternates(&values), "out of order: {values:?}");
            assert_ne!(values.last().copied(), Some(true));
        }
    }
}
