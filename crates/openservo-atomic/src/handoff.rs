//! Latest-value handoff between a non-RT writer and the RT reader.
//!
//! This module provides a single-producer / single-consumer handoff slot for
//! republishing a value (typically a fresh limit vector) from a non-realtime
//! configuration thread to the realtime enforce thread.
//!
//! # Contract
//!
//! - One writer, one reader. The handles are not clonable.
//! - [`HandoffWriter::publish`] never blocks; if the reader has not consumed
//!   the previous value yet, it is displaced and dropped on the writer's
//!   thread.
//! - [`HandoffReader::take_update`] never blocks and returns the most
//!   recently published value, or `None` when nothing new was published
//!   since the last take.
//! - A value published at time T is visible to every take that observes the
//!   publish's memory release; the reader may run one extra cycle on its
//!   previous value.
//!
//! # RT Safety
//!
//! The slot is a bounded lock-free queue of capacity one. Both operations
//! are a constant number of atomic instructions; neither side ever takes a
//! lock or allocates.

use std::sync::Arc;

use crossbeam::queue::ArrayQueue;

/// Create a connected writer/reader pair sharing one handoff slot.
pub fn realtime_handoff<T>() -> (HandoffWriter<T>, HandoffReader<T>) {
    let slot = Arc::new(ArrayQueue::new(1));
    (
        HandoffWriter {
            slot: Arc::clone(&slot),
        },
        HandoffReader { slot },
    )
}

/// Producer side of the handoff, held by the non-RT configuration path.
#[derive(Debug)]
pub struct HandoffWriter<T> {
    slot: Arc<ArrayQueue<T>>,
}

impl<T> HandoffWriter<T> {
    /// Publish a new value, displacing an unconsumed previous one.
    ///
    /// The displaced value (if any) is dropped here, on the writer's thread,
    /// so the reader never pays for the deallocation.
    pub fn publish(&self, value: T) {
        let _displaced = self.slot.force_push(value);
    }
}

/// Consumer side of the handoff, held by the RT enforce path.
#[derive(Debug)]
pub struct HandoffReader<T> {
    slot: Arc<ArrayQueue<T>>,
}

impl<T> HandoffReader<T> {
    /// Take the most recently published value, if one is pending.
    ///
    /// # RT Safety
    ///
    /// Lock-free pop; returns immediately in all cases.
    #[inline]
    pub fn take_update(&self) -> Option<T> {
        self.slot.pop()
    }
}
