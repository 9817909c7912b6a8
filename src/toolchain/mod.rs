//! Detection of the external build tool

mod probe;

pub use probe::{default_lookup_program, ProbeResult, Prober, ToolchainProbe};
