//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { frontend_root } => {
                debug!(root = %frontend_root.display(), "Starting orchestration");
            }
            ProgressEvent::ProbeComplete {
                tool,
                available,
                duration,
            } => {
                debug!(
                    tool = %tool,
                    available,
                    probe_time_ms = duration.as_millis(),
                    "Probe complete"
                );
            }
            ProgressEvent::BuildStarted { output_dir } => {
                debug!(output = %output_dir.display(), "Build started");
            }
            ProgressEvent::BuildComplete { outcome, duration } => {
                debug!(
                    outcome = %outcome,
                    build_time_ms = duration.as_millis(),
                    "Build complete"
                );
            }
            ProgressEvent::FallbackWritten { path } => {
                debug!(path = %path.display(), "Fallback written");
            }
            ProgressEvent::FallbackFailed { error } => {
                warn!(error = %error, "Fallback could not be written");
            }
            ProgressEvent::Ready { source, total_time } => {
                info!(
                    source = %source,
                    total_time_ms = total_time.as_millis(),
                    "Content ready"
                );
            }
        }
    }
}
