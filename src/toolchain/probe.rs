use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Whether the build tool was found on the execution path.
///
/// Produced once per process and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub tool: String,
    pub available: bool,
}

impl ProbeResult {
    pub fn available(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            available: true,
        }
    }

    pub fn absent(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            available: false,
        }
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self) -> ProbeResult;
}

/// Platform command that locates an executable on `PATH`.
pub fn default_lookup_program() -> &'static str {
    if cfg!(windows) {
        "where"
    } else {
        "which"
    }
}

/// Looks the tool up with `which`/`where` without running it.
#[derive(Debug, Clone)]
pub struct ToolchainProbe {
    tool: String,
    lookup_program: String,
}

impl ToolchainProbe {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            lookup_program: default_lookup_program().to_string(),
        }
    }

    /// Replaces the lookup command; the tool name is still passed as its only argument.
    pub fn with_lookup_program(mut self, program: impl Into<String>) -> Self {
        self.lookup_program = program.into();
        self
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }
}

#[async_trait]
impl Prober for ToolchainProbe {
    /// Any nonzero exit, a missing lookup program or a spawn error count as absent.
    async fn probe(&self) -> ProbeResult {
        debug!(
            tool = %self.tool,
            lookup = %self.lookup_program,
            "Probing for build tool"
        );

        let status = Command::new(&self.lookup_program)
            .arg(&self.tool)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await;

        let available = match status {
            Ok(status) => {
                debug!(tool = %self.tool, code = ?status.code(), "Lookup finished");
                status.success()
            }
            Err(e) => {
                debug!(
                    lookup = %self.lookup_program,
                    error = %e,
                    "Lookup program could not be started"
                );
                false
            }
        };

        if available {
            info!("{} is available.", self.tool);
            ProbeResult::available(self.tool.clone())
        } else {
            info!("{} is not available.", self.tool);
            ProbeResult::absent(self.tool.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup_program() {
        let probe = ToolchainProbe::new("flutter");
        assert_eq!(probe.lookup_program, default_lookup_program());
        assert_eq!(probe.tool(), "flutter");
    }

    #[tokio::test]
    async fn test_missing_tool_is_absent() {
        let result = ToolchainProbe::new("janatonese-no-such-tool-4d1c")
            .probe()
            .await;

        assert!(!result.available);
        assert_eq!(result.tool, "janatonese-no-such-tool-4d1c");
    }

    #[tokio::test]
    async fn test_missing_lookup_program_is_absent() {
        let result = ToolchainProbe::new("sh")
            .with_lookup_program("janatonese-no-such-lookup-4d1c")
            .probe()
            .await;

        assert!(!result.available);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_lookup_exit_status_decides() {
        // `true`/`false` ignore their argument, so only the exit status matters
        let ok = ToolchainProbe::new("anything")
            .with_lookup_program("true")
            .probe()
            .await;
        let failed = ToolchainProbe::new("sh")
            .with_lookup_program("false")
            .probe()
            .await;

        assert_eq!(ok, ProbeResult::available("anything"));
        assert_eq!(failed, ProbeResult::absent("sh"));
    }
}
