use super::outcome::{BuildFailure, BuildOutcome};
use crate::util::ensure_dir;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

#[async_trait]
pub trait Builder: Send + Sync {
    /// Runs one build into `output_dir`. Never retries.
    async fn build(&self, output_dir: &Path) -> BuildOutcome;
}

/// Runs the build tool as a child process in the front-end project root.
///
/// The child's stdout and stderr are inherited so build logs appear in the
/// server's own output. Only the exit status is inspected; the files the tool
/// writes are not validated.
#[derive(Debug, Clone)]
pub struct BuildOrchestrator {
    program: String,
    args: Vec<String>,
    project_root: PathBuf,
    timeout: Option<Duration>,
}

impl BuildOrchestrator {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            project_root: project_root.into(),
            timeout: None,
        }
    }

    /// Kills the build, including anything it forked, and reports `TimedOut`
    /// once `timeout` elapses.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn run_child(&self) -> Result<ExitStatus, BuildFailure> {
        let mut command = std::process::Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own group, so the build's helpers can be killed together with it.
            command.process_group(0);
        }

        let mut child = Command::from(command)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BuildFailure::Spawn(e.to_string()))?;

        debug!(pid = ?child.id(), "Build process spawned");

        let Some(limit) = self.timeout else {
            return child
                .wait()
                .await
                .map_err(|e| BuildFailure::Spawn(e.to_string()));
        };

        match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited.map_err(|e| BuildFailure::Spawn(e.to_string())),
            Err(_) => {
                warn!(timeout = ?limit, "Build exceeded timeout, terminating");
                if let Some(pid) = child.id() {
                    kill_process_group(pid).await;
                }
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill build process");
                }
                Err(BuildFailure::TimedOut(limit))
            }
        }
    }
}

/// Sends SIGKILL to every process in group `pgid`.
#[cfg(unix)]
async fn kill_process_group(pgid: u32) {
    let status = Command::new("kill")
        .arg("-KILL")
        .arg("--")
        .arg(format!("-{}", pgid))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) if status.success() => debug!(pgid, "Build process group killed"),
        Ok(status) => warn!(pgid, code = ?status.code(), "Failed to kill build process group"),
        Err(e) => warn!(pgid, error = %e, "Failed to kill build process group"),
    }
}

#[cfg(not(unix))]
async fn kill_process_group(_pgid: u32) {}

fn outcome_from_status(status: ExitStatus) -> BuildOutcome {
    if status.success() {
        return BuildOutcome::Succeeded;
    }
    match status.code() {
        Some(code) => BuildOutcome::Failed(BuildFailure::Exited(code)),
        None => BuildOutcome::Failed(BuildFailure::Terminated),
    }
}

#[async_trait]
impl Builder for BuildOrchestrator {
    async fn build(&self, output_dir: &Path) -> BuildOutcome {
        if let Err(e) = ensure_dir(output_dir).await {
            error!(
                dir = %output_dir.display(),
                error = %e,
                "Failed to create output directory"
            );
            return BuildOutcome::Failed(BuildFailure::OutputDir(e.to_string()));
        }

        info!(
            command = %self.command_line(),
            cwd = %self.project_root.display(),
            "Starting build"
        );
        let start = Instant::now();

        let outcome = match self.run_child().await {
            Ok(status) => outcome_from_status(status),
            Err(failure) => BuildOutcome::Failed(failure),
        };

        match &outcome {
            BuildOutcome::Succeeded => info!(
                duration_ms = start.elapsed().as_millis(),
                "Web app built successfully!"
            ),
            BuildOutcome::Failed(failure) => error!(
                exit_code = ?failure.exit_code(),
                duration_ms = start.elapsed().as_millis(),
                "Failed to build web app: {}",
                failure
            ),
            BuildOutcome::Skipped => {}
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_line() {
        let builder = BuildOrchestrator::new(
            "flutter",
            vec!["build".to_string(), "web".to_string()],
            "janatonese",
        );
        assert_eq!(builder.command_line(), "flutter build web");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_failed() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("build/web");
        let builder = BuildOrchestrator::new("janatonese-no-such-tool-4d1c", vec![], temp.path());

        let outcome = builder.build(&output).await;

        assert!(matches!(
            outcome,
            BuildOutcome::Failed(BuildFailure::Spawn(_))
        ));
        assert!(output.is_dir());
    }

    #[tokio::test]
    async fn test_unusable_output_dir_is_failed() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("build");
        std::fs::write(&blocker, "file in the way").unwrap();
        let builder = BuildOrchestrator::new("true", vec![], temp.path());

        let outcome = builder.build(&blocker.join("web")).await;

        assert!(matches!(
            outcome,
            BuildOutcome::Failed(BuildFailure::OutputDir(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_codes_map_to_outcome() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out");

        let ok = BuildOrchestrator::new("true", vec![], temp.path())
            .build(&output)
            .await;
        let failed = BuildOrchestrator::new(
            "sh",
            vec!["-c".to_string(), "exit 7".to_string()],
            temp.path(),
        )
        .build(&output)
        .await;

        assert_eq!(ok, BuildOutcome::Succeeded);
        assert_eq!(failed, BuildOutcome::Failed(BuildFailure::Exited(7)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_build() {
        let temp = TempDir::new().unwrap();
        let builder = BuildOrchestrator::new(
            "sh",
            vec!["-c".to_string(), "sleep 30".to_string()],
            temp.path(),
        )
        .with_timeout(Some(Duration::from_millis(200)));

        let start = Instant::now();
        let outcome = builder.build(&temp.path().join("out")).await;

        assert_eq!(
            outcome,
            BuildOutcome::Failed(BuildFailure::TimedOut(Duration::from_millis(200)))
        );
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_forked_helpers() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out");
        let builder = BuildOrchestrator::new(
            "sh",
            vec![
                "-c".to_string(),
                "(sleep 1; printf LATE > out/late.txt) & wait".to_string(),
            ],
            temp.path(),
        )
        .with_timeout(Some(Duration::from_millis(200)));

        let outcome = builder.build(&output).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(matches!(
            outcome,
            BuildOutcome::Failed(BuildFailure::TimedOut(_))
        ));
        assert!(!output.join("late.txt").exists());
    }
}
