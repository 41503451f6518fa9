//! Core types and traits for ferry.
//!
//! This crate provides the fundamental data structures shared by the broker
//! orchestrator and the local fallback engine: item references, operation
//! batches, the status taxonomy, history records, progress/status sinks, and
//! the collaborator traits the orchestration core is parameterised over.

mod batch;
mod context;
mod error;
mod history;
mod item;
mod services;
mod status;
mod trash;

pub use batch::{
    CollisionPolicy, OperationBatch, OperationKind, generate_unique_name,
};
pub use context::{OperationContext, ProgressSink, StatusSink};
pub use error::OpsError;
pub use history::HistoryRecord;
pub use item::{EXTENDED_LENGTH_PREFIX, FsItem, ItemKind, paths_equal};
pub use services::{
    ElevationService, FallbackEngine, ResolutionService, TrashStore, Verdict,
};
pub use status::StatusCode;
pub use trash::{
    LockingProcess, RECYCLE_DATA_PREFIX, RECYCLE_META_PREFIX, TrashEntry, sidecar_path,
};
