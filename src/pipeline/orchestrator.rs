use super::readiness::{readiness_channel, ContentReady, OrchestrationState, StateReporter};
use crate::build::{BuildOrchestrator, BuildOutcome, Builder};
use crate::config::ServerConfig;
use crate::fallback::{FallbackError, FallbackGenerator};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::toolchain::{ProbeResult, Prober, ToolchainProbe};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// What the output directory holds once the cycle is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Build,
    Fallback,
    /// Neither a build nor the placeholder could be produced
    Unavailable,
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Build => f.write_str("build"),
            ContentSource::Fallback => f.write_str("fallback"),
            ContentSource::Unavailable => f.write_str("unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackStatus {
    NotNeeded,
    Written(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct OrchestrationReport {
    pub probe: ProbeResult,
    pub outcome: BuildOutcome,
    pub fallback: FallbackStatus,
    pub elapsed: Duration,
}

impl OrchestrationReport {
    pub fn source(&self) -> ContentSource {
        match (&self.outcome, &self.fallback) {
            (BuildOutcome::Succeeded, _) => ContentSource::Build,
            (_, FallbackStatus::Written(_)) => ContentSource::Fallback,
            _ => ContentSource::Unavailable,
        }
    }

    pub fn fallback_failed(&self) -> bool {
        matches!(self.fallback, FallbackStatus::Failed(_))
    }
}

/// Runs the single probe → build-or-fallback cycle.
///
/// Failures never escape `run`; each one is logged and turned into the
/// outcome recorded in the report.
pub struct Orchestrator {
    prober: Box<dyn Prober>,
    builder: Box<dyn Builder>,
    fallback: FallbackGenerator,
    frontend_root: PathBuf,
    output_dir: PathBuf,
    progress_handler: Option<Box<dyn ProgressHandler>>,
    reporter: StateReporter,
}

impl Orchestrator {
    pub fn new(
        prober: Box<dyn Prober>,
        builder: Box<dyn Builder>,
        fallback: FallbackGenerator,
        frontend_root: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        let (reporter, _) = readiness_channel();
        Self {
            prober,
            builder,
            fallback,
            frontend_root,
            output_dir,
            progress_handler: None,
            reporter,
        }
    }

    /// Wires the stock probe, build command and placeholder page from `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, FallbackError> {
        let prober = ToolchainProbe::new(config.build_tool.clone());
        let builder = BuildOrchestrator::new(
            config.build_tool.clone(),
            config.build_args.clone(),
            config.frontend_root.clone(),
        )
        .with_timeout(config.build_timeout);

        Ok(Self::new(
            Box::new(prober),
            Box::new(builder),
            FallbackGenerator::embedded()?,
            config.frontend_root.clone(),
            config.output_dir(),
        )
        .with_progress_handler(Box::new(LoggingHandler)))
    }

    pub fn with_progress_handler(mut self, handler: Box<dyn ProgressHandler>) -> Self {
        self.progress_handler = Some(handler);
        self
    }

    /// Handle for observers that need to know when content is ready.
    pub fn content_ready(&self) -> ContentReady {
        self.reporter.subscribe()
    }

    pub fn state(&self) -> OrchestrationState {
        self.reporter.state()
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    fn advance(&self, next: OrchestrationState) {
        let from = self.reporter.state();
        if self.reporter.advance(next) {
            debug!(from = %from, to = %next, "Orchestration state changed");
        } else {
            error!(from = %from, to = %next, "Rejected orchestration state change");
        }
    }

    /// Runs the cycle. Only the first call does any work; later calls return
    /// `None` because `Ready` is terminal.
    pub async fn run(&self) -> Option<OrchestrationReport> {
        if self.reporter.state() != OrchestrationState::Init {
            debug!("Orchestration already ran, ignoring");
            return None;
        }

        let start = Instant::now();
        self.advance(OrchestrationState::Probing);
        self.emit(ProgressEvent::Started {
            frontend_root: self.frontend_root.clone(),
        });

        let probe_start = Instant::now();
        let probe = self.prober.probe().await;
        self.emit(ProgressEvent::ProbeComplete {
            tool: probe.tool.clone(),
            available: probe.available,
            duration: probe_start.elapsed(),
        });

        let outcome = if probe.available {
            self.advance(OrchestrationState::Building);
            self.emit(ProgressEvent::BuildStarted {
                output_dir: self.output_dir.clone(),
            });

            let build_start = Instant::now();
            let outcome = self.builder.build(&self.output_dir).await;
            self.emit(ProgressEvent::BuildComplete {
                outcome: outcome.clone(),
                duration: build_start.elapsed(),
            });
            outcome
        } else {
            BuildOutcome::Skipped
        };

        let fallback = if outcome.needs_fallback() {
            self.advance(OrchestrationState::FallingBack);
            info!("Serving placeholder app...");
            match self.fallback.write(&self.output_dir).await {
                Ok(path) => {
                    self.emit(ProgressEvent::FallbackWritten { path: path.clone() });
                    FallbackStatus::Written(path)
                }
                Err(e) => {
                    error!(error = %e, "Failed to write placeholder page");
                    self.emit(ProgressEvent::FallbackFailed {
                        error: e.to_string(),
                    });
                    FallbackStatus::Failed(e.to_string())
                }
            }
        } else {
            FallbackStatus::NotNeeded
        };

        let report = OrchestrationReport {
            probe,
            outcome,
            fallback,
            elapsed: start.elapsed(),
        };

        self.advance(OrchestrationState::Ready);
        self.emit(ProgressEvent::Ready {
            source: report.source(),
            total_time: report.elapsed,
        });

        Some(report)
    }
}
