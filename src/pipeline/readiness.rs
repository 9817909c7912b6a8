use std::fmt;
use std::time::Duration;
use tokio::sync::watch;

/// `Init → Probing → {Building | FallingBack} → Ready`, with
/// `Building → FallingBack` when the build fails. `Ready` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationState {
    Init,
    Probing,
    Building,
    FallingBack,
    Ready,
}

impl OrchestrationState {
    pub fn can_transition_to(self, next: OrchestrationState) -> bool {
        use OrchestrationState::*;
        matches!(
            (self, next),
            (Init, Probing)
                | (Probing, Building)
                | (Probing, FallingBack)
                | (Building, Ready)
                | (Building, FallingBack)
                | (FallingBack, Ready)
        )
    }
}

impl fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrchestrationState::Init => "init",
            OrchestrationState::Probing => "probing",
            OrchestrationState::Building => "building",
            OrchestrationState::FallingBack => "falling-back",
            OrchestrationState::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Write side of the state channel, owned by the orchestrator.
#[derive(Debug)]
pub struct StateReporter {
    tx: watch::Sender<OrchestrationState>,
}

impl StateReporter {
    /// Moves to `next`. Transitions outside the state machine are refused.
    pub fn advance(&self, next: OrchestrationState) -> bool {
        self.tx.send_if_modified(|current| {
            if current.can_transition_to(next) {
                *current = next;
                true
            } else {
                false
            }
        })
    }

    pub fn state(&self) -> OrchestrationState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ContentReady {
        ContentReady {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side, cloned into request handlers.
#[derive(Debug, Clone)]
pub struct ContentReady {
    rx: watch::Receiver<OrchestrationState>,
}

impl ContentReady {
    pub fn state(&self) -> OrchestrationState {
        *self.rx.borrow()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == OrchestrationState::Ready
    }

    /// Waits up to `timeout` for `Ready`. Returns false on timeout or when the
    /// orchestrator went away without finishing.
    pub async fn wait(&self, timeout: Duration) -> bool {
        let mut rx = self.rx.clone();
        let waited = tokio::time::timeout(timeout, rx.wait_for(|s| *s == OrchestrationState::Ready))
            .await
            .map(|r| r.is_ok());
        matches!(waited, Ok(true))
    }
}

pub fn readiness_channel() -> (StateReporter, ContentReady) {
    let (tx, rx) = watch::channel(OrchestrationState::Init);
    (StateReporter { tx }, ContentReady { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrchestrationState::*;

    #[test]
    fn test_valid_transitions() {
        assert!(Init.can_transition_to(Probing));
        assert!(Probing.can_transition_to(Building));
        assert!(Probing.can_transition_to(FallingBack));
        assert!(Building.can_transition_to(Ready));
        assert!(Building.can_transition_to(FallingBack));
        assert!(FallingBack.can_transition_to(Ready));
    }

    #[test]
    fn test_ready_is_terminal() {
        for next in [Init, Probing, Building, FallingBack, Ready] {
            assert!(!Ready.can_transition_to(next));
        }
    }

    #[test]
    fn test_reporter_refuses_invalid_transition() {
        let (reporter, ready) = readiness_channel();

        assert!(!reporter.advance(Building));
        assert_eq!(reporter.state(), Init);
        assert!(reporter.advance(Probing));
        assert_eq!(ready.state(), Probing);
    }

    #[tokio::test]
    async fn test_wait_times_out_before_ready() {
        let (reporter, ready) = readiness_channel();
        reporter.advance(Probing);

        assert!(!ready.wait(Duration::from_millis(50)).await);
        assert!(!ready.is_ready());
    }

    #[tokio::test]
    async fn test_wait_wakes_on_ready() {
        let (reporter, ready) = readiness_channel();
        let waiter = {
            let ready = ready.clone();
            tokio::spawn(async move { ready.wait(Duration::from_secs(5)).await })
        };

        reporter.advance(Probing);
        reporter.advance(FallingBack);
        reporter.advance(Ready);

        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_after_reporter_dropped_in_ready() {
        let (reporter, ready) = readiness_channel();
        reporter.advance(Probing);
        reporter.advance(FallingBack);
        reporter.advance(Ready);
        drop(reporter);

        assert!(ready.wait(Duration::from_millis(50)).await);
    }

    #[tokio::test]
    async fn test_wait_fails_when_reporter_dropped_early() {
        let (reporter, ready) = readiness_channel();
        drop(reporter);

        assert!(!ready.wait(Duration::from_secs(5)).await);
    }
}
