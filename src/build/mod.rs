//! Invocation of the external build tool

mod orchestrator;
mod outcome;

pub use orchestrator::{BuildOrchestrator, Builder};
pub use outcome::{BuildFailure, BuildOutcome};
