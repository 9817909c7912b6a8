use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a build did not produce a usable artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildFailure {
    #[error("build exited with code {0}")]
    Exited(i32),

    /// Terminated by a signal, so no exit code exists
    #[error("build was terminated without an exit code")]
    Terminated,

    #[error("build could not be started: {0}")]
    Spawn(String),

    #[error("build timed out after {0:?}")]
    TimedOut(Duration),

    #[error("output directory could not be prepared: {0}")]
    OutputDir(String),
}

impl BuildFailure {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildFailure::Exited(code) => Some(*code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The tool was not available, so nothing ran
    Skipped,
    Succeeded,
    Failed(BuildFailure),
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded)
    }

    /// Skipped and Failed both leave the output directory without a usable entry point.
    pub fn needs_fallback(&self) -> bool {
        !self.is_success()
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::Skipped => write!(f, "skipped"),
            BuildOutcome::Succeeded => write!(f, "succeeded"),
            BuildOutcome::Failed(failure) => write!(f, "failed ({})", failure),
        }
    }
}
