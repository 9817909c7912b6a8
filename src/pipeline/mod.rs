//! Probe, then build or fall back, once per process

mod orchestrator;
mod readiness;

pub use orchestrator::{ContentSource, FallbackStatus, OrchestrationReport, Orchestrator};
pub use readiness::{readiness_channel, ContentReady, OrchestrationState, StateReporter};
