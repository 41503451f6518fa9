//! Per-call context: progress/status sinks and cancellation.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::status::StatusCode;

/// Out-of-band progress reporting (0–100).
///
/// Sends are fire-and-forget: a closed receiver never fails the operation.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: Option<mpsc::Sender<f32>>,
}

impl ProgressSink {
    /// A sink delivering into `tx`.
    pub fn new(tx: mpsc::Sender<f32>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that discards every report.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Report a progress percentage.
    pub async fn report(&self, percent: f32) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(percent.clamp(0.0, 100.0)).await;
        }
    }
}

/// Out-of-band status reporting.
///
/// Every non-success path reports exactly one code describing the first
/// unresolved failure; per-item failures never surface as errors.
#[derive(Debug, Clone)]
pub struct StatusSink {
    tx: Option<mpsc::Sender<StatusCode>>,
}

impl StatusSink {
    /// A sink delivering into `tx`.
    pub fn new(tx: mpsc::Sender<StatusCode>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that discards every report.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Report a status code.
    pub async fn report(&self, code: StatusCode) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(code).await;
        }
    }
}

/// Everything a single top-level call carries besides its batch.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Progress sink for the call.
    pub progress: ProgressSink,
    /// Status sink for the call.
    pub status: StatusSink,
    /// Cancellation token scoped to the call. Cancellation is advisory;
    /// in-flight work may still complete and its result is still processed.
    pub cancel: CancellationToken,
}

impl OperationContext {
    /// A context with both sinks attached.
    pub fn new(progress: ProgressSink, status: StatusSink, cancel: CancellationToken) -> Self {
        Self {
            progress,
            status,
            cancel,
        }
    }

    /// A context with disabled sinks sharing `cancel`, for secondary
    /// operations whose outcome the caller does not observe.
    pub fn detached(cancel: CancellationToken) -> Self {
        Self {
            progress: ProgressSink::disabled(),
            status: StatusSink::disabled(),
            cancel,
        }
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::detached(CancellationToken::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_sinks_discard() {
        let ctx = OperationContext::default();
        ctx.progress.report(50.0).await;
        ctx.status.report(StatusCode::Success).await;
    }

    #[tokio::test]
    async fn test_progress_is_clamped() {
        let (tx, mut rx) = mpsc::channel(4);
        let sink = ProgressSink::new(tx);
        sink.report(140.0).await;
        assert_eq!(rx.recv().await, Some(100.0));
    }
}
