//! Shared state referenced by every handle to the same flag.

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::trace;

/// The one-shot boolean and the condition variable used to wait on it.
///
/// Only reachable through a handle. Callers must already hold the owning
/// handle's reference lock before touching `value`.
pub(crate) struct State {
    value: Mutex<bool>,
    signal: Condvar,
}

impl State {
    pub(crate) fn new() -> Self {
        trace!("shared flag state created");
        Self {
            value: Mutex::new(false),
            signal: Condvar::new(),
        }
    }

    pub(crate) fn is_set(&self) -> bool {
        *self.value.lock()
    }

    /// Set the flag and wake every waiter.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// flag was already set.
    pub(crate) fn set(&self) -> bool {
        let mut value = self.value.lock();
        if *value {
            return false;
        }
        *value = true;
        drop(value);
        // Broadcast only after unlocking so woken waiters can take the lock.
        self.signal.notify_all();
        true
    }

    pub(crate) fn wait(&self) {
        let mut value = self.value.lock();
        self.signal.wait_while(&mut value, |set| !*set);
    }

    pub(crate) fn wait_for(&self, timeout: Duration) -> bool {
        let mut value = self.value.lock();
        self.signal.wait_while_for(&mut value, |set| !*set, timeout);
        *value
    }

    pub(crate) fn wait_until(&self, deadline: Instant) -> bool {
        let mut value = self.value.lock();
        self.signal.wait_while_until(&mut value, |set| !*set, deadline);
        *value
    }
}

impl Drop for State {
    fn drop(&mut self) {
        trace!(set = *self.value.get_mut(), "shared flag state released");
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("State");
        match self.value.try_lock() {
            Some(value) => s.field("set", &*value),
            None => s.field("set", &format_args!("<locked>")),
        };
        s.finish()
    }
}
