use crate::error::{FlagError, FlagResult};
use crate::handle::Handle;
use crate::{copy_handle, sealed, FlagHandle, SharedFlagReader};
use std::fmt;
use tracing::debug;

/// A one-shot flag that can be set, queried and waited on from any number of
/// threads.
///
/// [`SharedFlag::new`] allocates a new shared state. Copies made with
/// [`try_clone`](Self::try_clone) or [`assign_from`](Self::assign_from)
/// reference the same state, so setting the flag through any of them wakes
/// waiters on all of them. Read-only copies come from
/// [`reader`](Self::reader).
///
/// Every constructor and assignment here takes another `SharedFlag` as its
/// source. A [`SharedFlagReader`] can never become a `SharedFlag`:
///
/// ```compile_fail
/// use shared_flag::SharedFlag;
///
/// let flag = SharedFlag::new();
/// let reader = flag.reader().unwrap();
/// let promoted = SharedFlag::new();
/// promoted.assign_from(&reader).unwrap();
/// ```
///
/// A handle becomes empty only by being the source of a move
/// ([`take`](Self::take) or [`move_from`](Self::move_from)). After that,
/// everything except [`valid`](FlagHandle::valid) fails with
/// [`FlagError::MovedAway`] until a reference is assigned back into it.
pub struct SharedFlag {
    handle: Handle,
}

impl SharedFlag {
    /// Create a flag with a new, unset shared state.
    pub fn new() -> Self {
        Self {
            handle: Handle::fresh(),
        }
    }

    /// Copy this flag's reference into a new flag.
    ///
    /// Does not block if another thread is waiting on `self`.
    pub fn try_clone(&self) -> FlagResult<Self> {
        Ok(Self {
            handle: copy_handle(self)?,
        })
    }

    /// Copy this flag's reference into a new read-only reader.
    pub fn reader(&self) -> FlagResult<SharedFlagReader> {
        SharedFlagReader::try_from_handle(self)
    }

    /// Release the current reference and share `source`'s state instead.
    ///
    /// Blocks until any wait in progress on `self` has finished. On error
    /// `self` keeps its previous reference.
    pub fn assign_from(&self, source: &SharedFlag) -> FlagResult<()> {
        self.handle.assign(&source.handle)
    }

    /// Move the reference out of `self` into a new flag, leaving `self` empty.
    ///
    /// Blocks until any wait in progress on `self` has finished.
    pub fn take(&self) -> FlagResult<Self> {
        Ok(Self {
            handle: self.handle.take()?,
        })
    }

    /// Release the current reference and take `source`'s, leaving `source`
    /// empty.
    ///
    /// Blocks until any wait in progress on either handle has finished. On
    /// error neither handle is modified.
    pub fn move_from(&self, source: &SharedFlag) -> FlagResult<()> {
        self.handle.transfer(&source.handle)
    }

    /// Set the flag and wake every thread waiting on it.
    ///
    /// Does nothing if the flag is already set. Only waiters on the same
    /// shared state are woken.
    pub fn set(&self) -> FlagResult<()> {
        if self.handle.with_state(|state| state.set())? {
            debug!("shared flag set");
        }
        Ok(())
    }
}

impl Default for SharedFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl sealed::Sealed for SharedFlag {
    fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl FlagHandle for SharedFlag {}

impl TryFrom<&SharedFlag> for SharedFlag {
    type Error = FlagError;

    fn try_from(source: &SharedFlag) -> FlagResult<Self> {
        source.try_clone()
    }
}

impl TryFrom<&SharedFlag> for bool {
    type Error = FlagError;

    fn try_from(flag: &SharedFlag) -> FlagResult<bool> {
        flag.get()
    }
}

impl fmt::Debug for SharedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedFlag").field(&self.handle).finish()
    }
}
