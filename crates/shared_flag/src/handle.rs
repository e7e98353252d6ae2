//! Reference management shared by both handle types.
//!
//! A [`Handle`] owns a reference to a [`State`] behind its own reader-writer
//! lock. Two levels of locking are involved and they are always taken in the
//! same order:
//!
//! 1. the handle's reference lock (shared for queries, waits and being copied
//!    from; exclusive for being assigned into or moved from),
//! 2. the state's content lock.
//!
//! Shared reference locks are always taken recursively: a reader never queues
//! behind a writer that is itself waiting for a long-running wait to finish.
//! Assignments still wait for every wait in progress on the target.
//!
//! No code path holds a content lock while acquiring a reference lock.
//! Operations touching two handles acquire both reference locks together via
//! [`lock_pair`], so assignments racing in opposite directions cannot
//! deadlock.

use crate::error::{FlagError, FlagResult};
use crate::state::State;
use parking_lot::RwLock;
use std::fmt;
use std::ptr;
use std::sync::Arc;
use std::thread;
use tracing::trace;

type Slot = Option<Arc<State>>;

pub struct Handle {
    state: RwLock<Slot>,
}

impl Handle {
    /// A handle to a brand-new, unset state.
    pub(crate) fn fresh() -> Self {
        Self {
            state: RwLock::new(Some(Arc::new(State::new()))),
        }
    }

    /// Copy-construct: share `source`'s state.
    pub(crate) fn copy_of(source: &Handle) -> FlagResult<Self> {
        let slot = source.state.read_recursive();
        let state = slot.as_ref().ok_or(FlagError::MovedAway)?;
        Ok(Self {
            state: RwLock::new(Some(Arc::clone(state))),
        })
    }

    /// Move-construct: take the state out of `self`, leaving it empty.
    ///
    /// Blocks while another thread is waiting on this handle.
    pub(crate) fn take(&self) -> FlagResult<Self> {
        let mut slot = self.state.write();
        let state = slot.take().ok_or(FlagError::MovedAway)?;
        trace!("shared flag reference moved out");
        Ok(Self {
            state: RwLock::new(Some(state)),
        })
    }

    /// Copy-assign: release the current reference and share `source`'s state.
    ///
    /// On error neither handle is modified.
    pub(crate) fn assign(&self, source: &Handle) -> FlagResult<()> {
        if ptr::eq(self, source) {
            return self.with_state(|_| ());
        }

        let (mut target, slot) = lock_pair(
            || self.state.write(),
            || self.state.try_write(),
            || source.state.read_recursive(),
            || source.state.try_read_recursive(),
        );
        let state = slot.as_ref().ok_or(FlagError::MovedAway)?;
        *target = Some(Arc::clone(state));
        Ok(())
    }

    /// Move-assign: release the current reference and take `source`'s,
    /// leaving `source` empty.
    ///
    /// On error neither handle is modified.
    pub(crate) fn transfer(&self, source: &Handle) -> FlagResult<()> {
        if ptr::eq(self, source) {
            return self.with_state(|_| ());
        }

        let (mut target, mut slot) = lock_pair(
            || self.state.write(),
            || self.state.try_write(),
            || source.state.write(),
            || source.state.try_write(),
        );
        let state = slot.take().ok_or(FlagError::MovedAway)?;
        *target = Some(state);
        trace!("shared flag reference moved between handles");
        Ok(())
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.state.read_recursive().is_some()
    }

    /// Run `f` against the referenced state while holding a shared reference
    /// lock for the whole call.
    ///
    /// Waits go through here so the state cannot be swapped out from under a
    /// blocked waiter; assignments into this handle queue behind it.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> FlagResult<R> {
        let slot = self.state.read_recursive();
        let state = slot.as_ref().ok_or(FlagError::MovedAway)?;
        Ok(f(state))
    }

    /// Whether `self` and `other` reference the identical state.
    pub(crate) fn same_state(&self, other: &Handle) -> FlagResult<bool> {
        if ptr::eq(self, other) {
            return self.with_state(|_| true);
        }

        let (ours, theirs) = lock_pair(
            || self.state.read_recursive(),
            || self.state.try_read_recursive(),
            || other.state.read_recursive(),
            || other.state.try_read_recursive(),
        );
        let ours = ours.as_ref().ok_or(FlagError::MovedAway)?;
        let theirs = theirs.as_ref().ok_or(FlagError::MovedAway)?;
        Ok(Arc::ptr_eq(ours, theirs))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_read_recursive() {
            Some(slot) => match slot.as_ref() {
                Some(state) => fmt::Debug::fmt(&**state, f),
                None => f.write_str("<moved away>"),
            },
            None => f.write_str("<locked>"),
        }
    }
}

/// Acquire two locks without holding one while blocking on the other.
///
/// Blocks on one lock, then only tries the other. If the try fails, releases
/// everything and starts again blocking on the lock that was contended.
fn lock_pair<A, B>(
    lock_a: impl Fn() -> A,
    try_a: impl Fn() -> Option<A>,
    lock_b: impl Fn() -> B,
    try_b: impl Fn() -> Option<B>,
) -> (A, B) {
    loop {
        let a = lock_a();
        if let Some(b) = try_b() {
            return (a, b);
        }
        drop(a);
        thread::yield_now();

        let b = lock_b();
        if let Some(a) = try_a() {
            return (a, b);
        }
        drop(b);
        thread::yield_now();
    }
}
