//! Collaborator traits the orchestration core is parameterised over.
//!
//! The core never renders UI, touches the trash store directly, or performs
//! non-privileged filesystem work itself; it calls these seams and branches
//! on their verdicts, which also makes every one of them trivially fakeable
//! in tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::batch::{CollisionPolicy, OperationBatch};
use crate::context::OperationContext;
use crate::error::OpsError;
use crate::history::HistoryRecord;
use crate::item::FsItem;
use crate::trash::{LockingProcess, TrashEntry};

/// The caller's choice in an interactive recovery prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Retry the failed items.
    Retry,
    /// Give up on the failed items.
    Cancel,
}

/// Non-privileged, in-process implementation of the operation set, used
/// when the broker channel is unavailable or a failure category demands
/// local execution.
#[async_trait]
pub trait FallbackEngine: Send + Sync {
    /// Copy the batch, honouring per-item collision policies.
    async fn copy_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError>;

    /// Move the batch, honouring per-item collision policies.
    async fn move_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError>;

    /// Delete the items, to trash unless `permanently`.
    async fn delete_items(
        &self,
        items: &[FsItem],
        permanently: bool,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError>;

    /// Rename a single item within its parent directory.
    async fn rename_item(
        &self,
        item: &FsItem,
        new_name: &str,
        policy: CollisionPolicy,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError>;

    /// Create an empty file or directory.
    async fn create_item(
        &self,
        item: &FsItem,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError>;

    /// Move recycled items back to their destinations.
    async fn restore_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError>;
}

/// Prompts the caller for elevation and, when granted, re-establishes the
/// broker channel at elevated privilege.
#[async_trait]
pub trait ElevationService: Send + Sync {
    /// Returns true once an elevated channel is available again.
    async fn request_elevation(&self) -> bool;
}

/// Interactive resolution prompts. Invoked only from the recovery path.
#[async_trait]
pub trait ResolutionService: Send + Sync {
    /// Ask the caller whether to retry items locked by other processes.
    async fn prompt_file_in_use(
        &self,
        paths: &[PathBuf],
        locking: &[LockingProcess],
    ) -> Verdict;

    /// Tell the caller a move would place a directory inside itself.
    async fn notify_structural_conflict(&self, source_name: &str, destination_name: &str);

    /// Tell the caller a source item no longer exists.
    async fn notify_not_found(&self);

    /// Tell the caller the destination already exists.
    async fn notify_already_exists(&self);
}

/// Read-only view of the trash store, consulted when building delete and
/// restore batches and when resolving display names for in-use prompts.
#[async_trait]
pub trait TrashStore: Send + Sync {
    /// Whether `path` lives under the trash root.
    fn is_under_trash(&self, path: &Path) -> bool;

    /// Enumerate the recycled items the store currently holds.
    async fn enumerate(&self) -> Vec<TrashEntry>;

    /// Which processes hold locks on the given paths.
    async fn locking_processes(&self, paths: &[PathBuf]) -> Vec<LockingProcess>;
}
