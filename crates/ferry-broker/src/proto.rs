//! Wire frames exchanged with the privileged worker.
//!
//! Frames are serde values; the transport (named pipe, unix socket) lives
//! outside this crate and hands us paired mpsc channels. Paths travel as
//! strings because the worker runs in a separate process.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The action a [`WorkerRequest`] asks the worker to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerAction {
    Copy,
    Move,
    Delete,
    Rename,
    CreateFile,
    CreateFolder,
    CreateLink,
}

/// One privileged request, correlated end to end by `op_id`.
///
/// The same `op_id` is reused across every retry and replay of a top-level
/// call, so progress consumers see one continuous stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub op_id: Uuid,
    pub action: WorkerAction,
    pub sources: Vec<String>,
    /// Aligned with `sources`; empty for delete.
    pub destinations: Vec<String>,
    /// Overwrite colliding destinations instead of failing on them.
    pub overwrite: bool,
    /// Delete only: bypass the recycle store.
    pub permanently: bool,
}

impl WorkerRequest {
    /// A request with no destination side (delete).
    pub fn deletion(op_id: Uuid, sources: Vec<String>, permanently: bool) -> Self {
        Self {
            op_id,
            action: WorkerAction::Delete,
            sources,
            destinations: Vec::new(),
            overwrite: false,
            permanently,
        }
    }

    /// A source/destination transfer request.
    pub fn transfer(
        op_id: Uuid,
        action: WorkerAction,
        sources: Vec<String>,
        destinations: Vec<String>,
        overwrite: bool,
    ) -> Self {
        Self {
            op_id,
            action,
            sources,
            destinations,
            overwrite,
            permanently: false,
        }
    }
}

/// Frames the client sends to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientFrame {
    Request(WorkerRequest),
    /// Advisory cancellation of an in-flight request.
    Cancel { op_id: Uuid },
}

/// Frames the worker sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerFrame {
    /// Out-of-band progress for an in-flight request.
    Progress { op_id: Uuid, percent: f32 },
    /// Terminal response; exactly one per request.
    Completed(WorkerReply),
}

/// The worker's terminal response to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReply {
    pub op_id: Uuid,
    /// Whether every item succeeded.
    pub success: bool,
    /// Per-item outcomes, in request order.
    pub items: Vec<ItemOutcome>,
}

impl WorkerReply {
    /// The outcomes that failed.
    pub fn failed(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|i| !i.succeeded)
    }

    /// The source paths of failed outcomes.
    pub fn failed_sources(&self) -> Vec<&str> {
        self.failed().map(|i| i.source.as_str()).collect()
    }
}

/// The result of one item within a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub source: String,
    /// The final path the worker produced, when one exists. A delete to the
    /// recycle store reports the recycle location here.
    pub destination: Option<String>,
    pub succeeded: bool,
    /// The worker's native result code; `0` on success.
    pub native_code: i32,
}

impl ItemOutcome {
    /// A successful outcome.
    pub fn ok(source: impl Into<String>, destination: Option<String>) -> Self {
        Self {
            source: source.into(),
            destination,
            succeeded: true,
            native_code: 0,
        }
    }

    /// A failed outcome carrying a native code.
    pub fn failed(source: impl Into<String>, native_code: i32) -> Self {
        Self {
            source: source.into(),
            destination: None,
            succeeded: false,
            native_code,
        }
    }
}
