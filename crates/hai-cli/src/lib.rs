//! Batch runner and logging for the `hai-summary` binary.

pub mod logging;
pub mod pipeline;
pub mod worker;
