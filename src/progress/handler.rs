//! Progress handler trait and events

use crate::build::BuildOutcome;
use crate::pipeline::ContentSource;
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while the orchestration cycle runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Cycle started for the given front-end root
    Started { frontend_root: PathBuf },

    /// Tool lookup finished
    ProbeComplete {
        tool: String,
        available: bool,
        duration: Duration,
    },

    /// Build process about to be spawned
    BuildStarted { output_dir: PathBuf },

    /// Build process finished, failed to start, or timed out
    BuildComplete {
        outcome: BuildOutcome,
        duration: Duration,
    },

    /// Placeholder page written
    FallbackWritten { path: PathBuf },

    /// Placeholder page could not be written
    FallbackFailed { error: String },

    /// Cycle reached its terminal state
    Ready {
        source: ContentSource,
        total_time: Duration,
    },
}

/// Trait for handling progress events during orchestration
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::ProbeComplete {
            tool: "flutter".to_string(),
            available: false,
            duration: Duration::from_millis(5),
        });
        handler.on_progress(&ProgressEvent::FallbackWritten {
            path: PathBuf::from("/app/build/web/index.html"),
        });
        handler.on_progress(&ProgressEvent::Ready {
            source: ContentSource::Fallback,
            total_time: Duration::from_millis(20),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::BuildComplete {
            outcome: BuildOutcome::Succeeded,
            duration: Duration::from_secs(1),
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("BuildComplete"));
    }
}
