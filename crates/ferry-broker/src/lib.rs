//! Privileged-worker orchestration for ferry.
//!
//! This crate drives bulk filesystem operations through an out-of-process
//! privileged worker: it partitions batches by collision policy, dispatches
//! wire requests over the broker channel, classifies per-item native result
//! codes into a failure taxonomy, and recovers (elevate and replay, prompt
//! and retry, or re-execute locally through the fallback engine) until the
//! batch reaches a terminal outcome.

mod channel;
mod classify;
mod history;
mod orchestrator;
mod partition;
mod proto;
mod recovery;

pub use channel::{BrokerChannel, FRAME_CHANNEL_SIZE, ProgressGuard};
pub use classify::{METADATA_SENTINEL, all_metadata_failures, classify, first_failure_status};
pub use history::{build_delete_history, build_history};
pub use orchestrator::ShellOrchestrator;
pub use partition::{PartitionedBatch, partition};
pub use proto::{ClientFrame, ItemOutcome, WorkerAction, WorkerFrame, WorkerReply, WorkerRequest};
pub use recovery::{FailureReason, RetryBudget, dominant_failure};
