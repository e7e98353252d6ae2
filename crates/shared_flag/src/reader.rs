use crate::error::{FlagError, FlagResult};
use crate::handle::Handle;
use crate::{copy_handle, sealed, FlagHandle, SharedFlag};
use std::fmt;

/// Read-only view of a shared flag: it can query and wait, never set.
///
/// Readers are created from a [`SharedFlag`] (or another reader) and share
/// its state. Any number of readers and flags may reference the same state.
///
/// Copying and moving go through explicit, fallible operations because the
/// source may have been moved away:
///
/// | operation        | method                                   |
/// |------------------|------------------------------------------|
/// | copy-construct   | [`try_from_handle`](Self::try_from_handle), [`try_clone`](Self::try_clone) |
/// | copy-assign      | [`assign_from`](Self::assign_from)       |
/// | move-construct   | [`take`](Self::take)                     |
/// | move-assign      | [`move_from`](Self::move_from)           |
///
/// A reader can never be turned into a [`SharedFlag`].
pub struct SharedFlagReader {
    handle: Handle,
}

impl SharedFlagReader {
    /// Copy a reference to `source`'s shared state.
    ///
    /// Does not block if another thread is waiting on `source`.
    pub fn try_from_handle<H: FlagHandle>(source: &H) -> FlagResult<Self> {
        Ok(Self {
            handle: copy_handle(source)?,
        })
    }

    /// Copy this reader's reference into a new reader.
    pub fn try_clone(&self) -> FlagResult<Self> {
        Self::try_from_handle(self)
    }

    /// Release the current reference and share `source`'s state instead.
    ///
    /// Blocks until any wait in progress on `self` has finished. On error
    /// `self` keeps its previous reference.
    pub fn assign_from<H: FlagHandle>(&self, source: &H) -> FlagResult<()> {
        self.handle.assign(sealed::Sealed::handle(source))
    }

    /// Move the reference out of `self` into a new reader, leaving `self`
    /// empty.
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
    pub fn move_from<H: FlagHandle>(&self, source: &H) -> FlagResult<()> {
        self.handle.transfer(sealed::Sealed::handle(source))
    }
}

impl sealed::Sealed for SharedFlagReader {
    fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl FlagHandle for SharedFlagReader {}

impl TryFrom<&SharedFlagReader> for SharedFlagReader {
    type Error = FlagError;

    fn try_from(source: &SharedFlagReader) -> FlagResult<Self> {
        Self::try_from_handle(source)
    }
}

impl TryFrom<&SharedFlag> for SharedFlagReader {
    type Error = FlagError;

    fn try_from(source: &SharedFlag) -> FlagResult<Self> {
        Self::try_from_handle(source)
    }
}

impl TryFrom<&SharedFlagReader> for bool {
    type Error = FlagError;

    fn try_from(reader: &SharedFlagReader) -> FlagResult<bool> {
        reader.get()
    }
}

impl fmt::Debug for SharedFlagReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedFlagReader").field(&self.handle).finish()
    }
}
