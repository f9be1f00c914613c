//! Loop Scheduler
//!
//! Runs named repeating ticks on the tokio runtime. Each key owns at most one
//! loop; starting a key again replaces the running loop.

mod registry;

pub use registry::{LoopRegistry, LoopSpec};
