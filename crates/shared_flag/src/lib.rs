//! One-shot shared boolean flag for cooperative thread cancellation.
//!
//! A [`SharedFlag`] can set, query and wait on a flag whose state is shared by
//! every handle copied from it. A [`SharedFlagReader`] can only query and wait,
//! and no API turns a reader back into a writable flag.
//!
//! The flag starts unset and can be set exactly once. Existing handles can be
//! reassigned to a different shared state, but that never propagates to other
//! handles referencing the old one.
//!
//! ```
//! use shared_flag::{FlagHandle, SharedFlag, SharedFlagReader};
//! use std::thread;
//! use std::time::Duration;
//!
//! fn worker(stop: SharedFlagReader) -> shared_flag::FlagResult<u32> {
//!     let mut ticks = 0;
//!     while !stop.wait_for(Duration::from_millis(5))? {
//!         ticks += 1;
//!     }
//!     Ok(ticks)
//! }
//!
//! let stop = SharedFlag::new();
//! let reader = stop.reader()?;
//! let task = thread::spawn(move || worker(reader));
//!
//! thread::sleep(Duration::from_millis(20));
//! stop.set()?;
//! task.join().unwrap()?;
//! # Ok::<(), shared_flag::FlagError>(())
//! ```
//!
//! If the flag is unset and every remaining handle is a reader, nothing can
//! set it any more and an unbounded [`FlagHandle::wait`] blocks forever.

mod error;
mod flag;
mod handle;
mod reader;
mod state;

pub use error::{FlagError, FlagResult};
pub use flag::SharedFlag;
pub use reader::SharedFlagReader;

use handle::Handle;
use std::time::{Duration, Instant};

mod sealed {
    pub trait Sealed {
        fn handle(&self) -> &crate::handle::Handle;
    }
}

/// Query and wait operations available on every flag handle.
///
/// Implemented by [`SharedFlag`] and [`SharedFlagReader`] only.
///
/// All of these are safe to call from several threads on the same handle at
/// once. Waiting on a handle blocks assignments and moves *into or out of*
/// that handle until the wait finishes. Queries, copies and `set` on it are
/// never blocked by a wait, even while such an assignment is queued.
pub trait FlagHandle: sealed::Sealed {
    /// Whether this handle references a shared state.
    ///
    /// Returns `false` after the handle was the source of a move and before
    /// anything has been assigned back into it.
    fn valid(&self) -> bool {
        self.handle().is_valid()
    }

    /// Whether the flag has been set.
    fn get(&self) -> FlagResult<bool> {
        self.handle().with_state(|state| state.is_set())
    }

    /// Block until the flag is set. Returns immediately if it already is.
    fn wait(&self) -> FlagResult<()> {
        self.handle().with_state(|state| state.wait())
    }

    /// Block until the flag is set or `timeout` elapses.
    ///
    /// Returns `false` only if the flag was still unset when the timeout
    /// expired.
    fn wait_for(&self, timeout: Duration) -> FlagResult<bool> {
        self.handle().with_state(|state| state.wait_for(timeout))
    }

    /// Block until the flag is set or `deadline` is reached.
    ///
    /// Returns `false` only if the flag was still unset at the deadline.
    fn wait_until(&self, deadline: Instant) -> FlagResult<bool> {
        self.handle().with_state(|state| state.wait_until(deadline))
    }

    /// Whether `self` and `other` reference the identical shared state.
    fn same_state<H: FlagHandle>(&self, other: &H) -> FlagResult<bool> {
        self.handle().same_state(other.handle())
    }
}

fn copy_handle<H: FlagHandle>(source: &H) -> FlagResult<Handle> {
    Handle::copy_of(source.handle())
}
