use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Shared abort switch for one pipeline run. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Resolves once the flag is set.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            tokio::time::sleep(CANCEL_POLL).await;
        }
    }
}

/// Tagged result of one guarded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Success(T),
    TimedOut,
    Cancelled,
    Failed(String),
}

impl<T> CallOutcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            CallOutcome::Success(v) => Some(v),
            _ => None,
        }
    }
}

/// Run one outbound call with a timeout and the run's cancel flag.
/// Errors never escape: they are logged against `endpoint` and tagged.
pub async fn guarded<T, F>(
    endpoint: &'static str,
    timeout: Duration,
    cancel: &CancelFlag,
    call: F,
) -> CallOutcome<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    if cancel.is_cancelled() {
        return CallOutcome::Cancelled;
    }

    tokio::select! {
        result = tokio::time::timeout(timeout, call) => match result {
            Ok(Ok(value)) => CallOutcome::Success(value),
            Ok(Err(e)) => {
                let message = format!("{e:#}");
                warn!(endpoint, error = %message, "Call failed");
                CallOutcome::Failed(message)
            }
            Err(_) => {
                warn!(endpoint, timeout_secs = timeout.as_secs_f64(), "Call timed out");
                CallOutcome::TimedOut
            }
        },
        _ = cancel.cancelled() => {
            warn!(endpoint, "Call abandoned, run cancelled");
            CallOutcome::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_is_tagged() {
        let cancel = CancelFlag::new();
        let outcome = guarded("test", Duration::from_secs(1), &cancel, async {
            Ok::<_, anyhow::Error>(7)
        })
        .await;
        assert_eq!(outcome, CallOutcome::Success(7));
    }

    #[tokio::test]
    async fn errors_are_captured_not_raised() {
        let cancel = CancelFlag::new();
        let outcome: CallOutcome<u32> = guarded("test", Duration::from_secs(1), &cancel, async {
            Err::<u32, _>(anyhow::anyhow!("API error (status 500): boom"))
        })
        .await;
        match outcome {
            CallOutcome::Failed(msg) => assert!(msg.contains("500")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_call_times_out() {
        let cancel = CancelFlag::new();
        let outcome: CallOutcome<u32> = guarded(
            "test",
            Duration::from_secs(5),
            &cancel,
            std::future::pending::<anyhow::Result<u32>>(),
        )
        .await;
        assert_eq!(outcome, CallOutcome::TimedOut);
    }

    #[tokio::test]
    async fn pre_cancelled_run_skips_the_call() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let outcome = guarded("test", Duration::from_secs(1), &cancel, async {
            Ok::<u32, anyhow::Error>(1)
        })
        .await;
        assert_eq!(outcome, CallOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_call_abandons_it() {
        let cancel = CancelFlag::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });
        let outcome: CallOutcome<u32> = guarded(
            "test",
            Duration::from_secs(60),
            &cancel,
            std::future::pending::<anyhow::Result<u32>>(),
        )
        .await;
        assert_eq!(outcome, CallOutcome::Cancelled);
    }
}
