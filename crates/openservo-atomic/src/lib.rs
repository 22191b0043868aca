//! # openservo-atomic
//!
//! RT-safe primitives for the openservo joint-limit enforcement stack.
//!
//! This crate provides the two pieces of shared state the realtime enforce
//! loop touches without allocating, blocking, or issuing syscalls:
//!
//! - [`handoff`] - a single-producer / single-consumer latest-value handoff
//!   used to republish joint limits from a non-realtime parameter thread to
//!   the realtime enforce thread.
//! - [`counters`] - relaxed atomic counters for enforcement accounting.
//!
//! ## Safety Guarantees
//!
//! - **No heap allocations** on the realtime side after initialization
//! - **No blocking operations** - all realtime methods are lock-free
//! - **Deterministic execution time** for all realtime operations
//!
//! ## Usage
//!
//! ```rust
//! use openservo_atomic::{realtime_handoff, EnforceCounters};
//!
//! let (writer, reader) = realtime_handoff();
//!
//! // Non-RT thread: publish a fresh value (never blocks the reader).
//! writer.publish(vec![1.0, 2.0]);
//!
//! // RT thread: pick up the latest published value, if any.
//! assert_eq!(reader.take_update(), Some(vec![1.0, 2.0]));
//! assert_eq!(reader.take_update(), None);
//!
//! let counters = EnforceCounters::new();
//! counters.inc_cycle();
//! assert_eq!(counters.snapshot().cycles, 1);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used, missing_docs)]
#![warn(missing_debug_implementations)]

pub mod counters;
pub mod handoff;
pub mod prelude;

pub use counters::{CountersSnapshot, EnforceCounters};
pub use handoff::{realtime_handoff, HandoffReader, HandoffWriter};
