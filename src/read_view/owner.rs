//! Owner cell: the single concurrently-touched field of a read view.
//!
//! Tracks which thread (if any) currently owns an activated read view. Shared
//! between the aggregate and every index read view handle, which is how a
//! child checks ownership without a raw back pointer. The lock guards only
//! the marker itself; callers serialize activate/deactivate.

use std::sync::Mutex;
use std::thread::{self, ThreadId};

#[derive(Debug)]
pub(crate) struct OwnerCell {
    thread: Mutex<Option<ThreadId>>,
}

impl OwnerCell {
    pub(crate) fn new() -> Self {
        Self {
            thread: Mutex::new(None),
        }
    }

    pub(crate) fn owner(&self) -> Option<ThreadId> {
        *self.thread.lock().expect("owner cell poisoned")
    }

    pub(crate) fn is_held_by_current(&self) -> bool {
        self.owner() == Some(thread::current().id())
    }

    /// Bind to the calling thread. Caller must have checked the cell is free.
    pub(crate) fn set_current(&self) {
        let mut slot = self.thread.lock().expect("owner cell poisoned");
        debug_assert!(slot.is_none());
        *slot = Some(thread::current().id());
    }

    /// Release. Caller must be the owner.
    pub(crate) fn clear(&self) {
        let mut slot = self.thread.lock().expect("owner cell poisoned");
        debug_assert_eq!(*slot, Some(thread::current().id()));
        *slot = None;
    }
}
