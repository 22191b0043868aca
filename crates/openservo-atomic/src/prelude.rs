//! Convenience re-exports of the crate's public surface.

pub use crate::counters::{CountersSnapshot, EnforceCounters};
pub use crate::handoff::{realtime_handoff, HandoffReader, HandoffWriter};
