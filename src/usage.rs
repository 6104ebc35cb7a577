//! The collection usage example: a catalogue of call shapes and a runner.

pub mod exec;
pub mod run;
pub mod steps;

pub use exec::{Operation, Outcome, execute};
pub use run::{RunPolicy, RunReport, StepReport, StepStatus, run_steps};
pub use steps::{Step, catalogue, select};

use crate::collection::CollectionApi;

/// Runs the whole example against `col`, continuing past failures.
pub async fn usage_example<C: CollectionApi>(col: &C) -> RunReport {
    run_steps(col, &catalogue(), RunPolicy::default()).await
}
