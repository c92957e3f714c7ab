//! The Worker: consumes `WorkMessage`s off the broker and drives each
//! through the per-query state machine.

pub mod batch;
pub mod pipeline;
pub mod single;

pub use batch::run_batch;
pub use pipeline::Worker;
pub use single::{SingleOutcome, SinglePipeline, StageFailure};
