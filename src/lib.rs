//! janatonese-server - build-or-fallback orchestration for a web front-end
//!
//! At startup the server looks for the front-end build tool. When it is
//! installed the web build runs once into `<frontend>/build/web`; when it is
//! missing, or the build fails, a static placeholder page is written there
//! instead. The HTTP listener starts straight away and serves whatever the
//! output directory holds, sending `index.html` for every unmatched route.
//!
//! # Example
//!
//! ```no_run
//! use janatonese_server::{Orchestrator, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env();
//! let orchestrator = Orchestrator::from_config(&config)?;
//!
//! if let Some(report) = orchestrator.run().await {
//!     println!("content source: {}", report.source());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`toolchain`]: build tool detection
//! - [`build`]: running the build and interpreting its exit status
//! - [`fallback`]: the placeholder page
//! - [`pipeline`]: the one-shot orchestration cycle and its readiness signal
//! - [`server`]: static file serving with single-page-app routing

pub mod build;
pub mod cli;
pub mod config;
pub mod fallback;
pub mod pipeline;
pub mod progress;
pub mod server;
pub mod toolchain;
pub mod util;

pub use build::{BuildFailure, BuildOrchestrator, BuildOutcome, Builder};
pub use config::{ConfigError, ServerConfig};
pub use fallback::{FallbackContent, FallbackError, FallbackGenerator};
pub use pipeline::{
    ContentReady, ContentSource, FallbackStatus, OrchestrationReport, OrchestrationState,
    Orchestrator,
};
pub use server::{build_router, AppState, ReadyGate, ServerError};
pub use toolchain::{ProbeResult, Prober, ToolchainProbe};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "janatonese-server");
    }
}
