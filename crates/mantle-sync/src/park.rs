//! Single-permit thread parking.
//!
//! A [`Parker`] suspends its owning thread until a permit arrives, a
//! deadline elapses, or a spurious wakeup occurs; callers must re-check
//! their condition in a loop. The matching [`Unparker`] makes one permit
//! available from any thread: unparking a thread that is not parked banks
//! the permit, which is consumed by that thread's next park. At most one
//! permit is ever banked — repeated unparks do not accumulate.
//!
//! State machine on a single atomic: `EMPTY → PARKED` when the owner
//! blocks, `→ NOTIFIED` when a permit arrives, back to `EMPTY` when the
//! permit is consumed or the park gives up.

use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant, SystemTime};

const EMPTY: usize = 0;
const PARKED: usize = 1;
const NOTIFIED: usize = 2;

/// When a park call should give up waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParkDeadline {
    /// Wait until a permit arrives (or a spurious wakeup).
    Indefinite,
    /// Wait at most this long, measured on the monotonic clock.
    Relative(Duration),
    /// Wait until this wall-clock time. A deadline already in the past
    /// returns immediately.
    Absolute(SystemTime),
}

struct Inner {
    state: AtomicUsize,
    lock: Mutex<()>,
    cvar: Condvar,
}

/// The parking side of a parker pair. Owned by the thread that parks.
///
/// `Send` but not `Sync`: exactly one thread may park on it at a time.
pub struct Parker {
    inner: Arc<Inner>,
    /// Parking is a single-consumer operation.
    _not_sync: PhantomData<Cell<()>>,
}

/// The waking side of a parker pair. Freely cloned and shared.
#[derive(Clone)]
pub struct Unparker {
    inner: Arc<Inner>,
}

// Compile-time assertions: Unparker crosses threads, Parker may move once.
const _: fn() = || {
    fn assert_send<T: Send>() {}
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send::<Parker>();
    assert_send_sync::<Unparker>();
};

impl Default for Parker {
    fn default() -> Self {
        Self::new()
    }
}

impl Parker {
    /// Create a new parker with no banked permit.
    pub fn new() -> Parker {
        Parker {
            inner: Arc::new(Inner {
                state: AtomicUsize::new(EMPTY),
                lock: Mutex::new(()),
                cvar: Condvar::new(),
            }),
            _not_sync: PhantomData,
        }
    }

    /// Get an [`Unparker`] for this parker.
    pub fn unparker(&self) -> Unparker {
        Unparker {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Suspend the calling thread until a permit is consumed, the deadline
    /// elapses, or a spurious wakeup occurs.
    ///
    /// A permit banked by an earlier [`Unparker::unpark`] is consumed
    /// without blocking.
    pub fn park(&self, deadline: ParkDeadline) {
        // Fast path: consume a banked permit.
        if self
            .inner
            .state
            .compare_exchange(NOTIFIED, EMPTY, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return;
        }

        let target = match deadline {
            ParkDeadline::Indefinite => None,
            // A duration the monotonic clock cannot represent is
            // indistinguishable from waiting forever.
            ParkDeadline::Relative(d) => Instant::now().checked_add(d),
            ParkDeadline::Absolute(t) => match t.duration_since(SystemTime::now()) {
                Ok(remaining) => Instant::now().checked_add(remaining),
                // Deadline already passed.
                Err(_) => return,
            },
        };

        let mut guard = self.inner.lock.lock().unwrap();
        match self
            .inner
            .state
            .compare_exchange(EMPTY, PARKED, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {}
            // A permit arrived between the fast path and taking the lock.
            Err(_) => {
                self.inner.state.store(EMPTY, Ordering::SeqCst);
                return;
            }
        }

        loop {
            guard = match target {
                None => self.inner.cvar.wait(guard).unwrap(),
                Some(t) => {
                    let now = Instant::now();
                    if now >= t {
                        break;
                    }
                    let (g, _) = self.inner.cvar.wait_timeout(guard, t - now).unwrap();
                    g
                }
            };
            if self
                .inner
                .state
                .compare_exchange(NOTIFIED, EMPTY, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return;
            }
            // Spurious wakeup: re-check the deadline and wait again.
        }

        // Deadline elapsed. A permit that raced in during the final
        // timeout window is consumed by this park.
        drop(guard);
        self.inner.state.swap(EMPTY, Ordering::SeqCst);
    }
}

impl Unparker {
    /// Make one permit available to the parker.
    ///
    /// If its thread is parked it wakes promptly; otherwise the permit is
    /// banked for the next park. Permits do not accumulate.
    pub fn unpark(&self) {
        if self.inner.state.swap(NOTIFIED, Ordering::SeqCst) == PARKED {
            // The owner is blocked or committing to block. Synchronize on
            // the lock so this notify cannot fall between its state
            // transition and its wait.
            drop(self.inner.lock.lock().unwrap());
            self.inner.cvar.notify_one();
        }
    }
}

thread_local! {
    static CURRENT: Parker = Parker::new();
}

/// Park the calling thread on its thread-local parker.
pub fn park_current(deadline: ParkDeadline) {
    CURRENT.with(|p| p.park(deadline));
}

/// Get an [`Unparker`] targeting the calling thread's thread-local parker.
///
/// Hand it to another thread to be woken later — the analog of unparking a
/// thread by its handle.
pub fn current_unparker() -> Unparker {
    CURRENT.with(|p| p.unparker())
}
