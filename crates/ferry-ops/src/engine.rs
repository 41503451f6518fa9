//! In-process, non-privileged implementation of the operation set.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, warn};

use ferry_core::{
    CollisionPolicy, FallbackEngine, FsItem, HistoryRecord, OperationBatch, OperationContext,
    OperationKind, OpsError, StatusCode, generate_unique_name,
};

use crate::naming::validate_name;
use crate::transfer;

/// Executes operations directly in this process with `std::fs`, used when
/// the privileged worker is unavailable or a failure category demands local
/// execution.
#[derive(Debug, Default)]
pub struct LocalEngine;

impl LocalEngine {
    pub fn new() -> Self {
        Self
    }

    /// Shared batch loop for copy, move, and restore.
    async fn transfer_batch(
        &self,
        kind: OperationKind,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        let total = batch.len().max(1) as f32;
        let mut undo = Vec::new();
        let mut redo = Vec::new();
        let mut overwrote = false;

        for (index, (source, destination, policy)) in batch.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                return Err(OpsError::Cancelled);
            }
            if policy == CollisionPolicy::Skip {
                continue;
            }

            let mut target = destination.clone();
            let mut replaced = false;
            if target.exists() && !source.same_path(&target) {
                match policy {
                    CollisionPolicy::ReplaceExisting => {
                        let path = target.clone();
                        run_blocking(move || transfer::remove_path(&path))
                            .await
                            .map_err(|e| OpsError::io(&target, e))?;
                        replaced = true;
                        overwrote = true;
                    }
                    CollisionPolicy::GenerateNewName => {
                        target = generate_unique_name(&target);
                    }
                    CollisionPolicy::Skip => unreachable!(),
                }
            }

            let src = source.path.clone();
            let dst = target.clone();
            let result = if kind == OperationKind::Copy {
                run_blocking(move || transfer::copy_path(&src, &dst)).await
            } else {
                run_blocking(move || transfer::move_path(&src, &dst)).await
            };

            if let Err(error) = result {
                warn!(source = %source.path.display(), %error, "{kind} failed in fallback engine");
                ctx.status.report(status_for_io(&error)).await;
                return Ok(None);
            }

            // Replaced destinations are excluded: their previous content is
            // gone, so the pair cannot be reversed.
            if !replaced && !source.same_path(&target) {
                undo.push(source.clone());
                redo.push(source.relocated(target));
            }
            ctx.progress.report((index + 1) as f32 / total * 100.0).await;
        }

        ctx.status.report(StatusCode::Success).await;
        if undo.is_empty() && overwrote {
            return Ok(None);
        }
        Ok(Some(HistoryRecord::new(kind, undo, Some(redo))))
    }
}

#[async_trait]
impl FallbackEngine for LocalEngine {
    async fn copy_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        self.transfer_batch(OperationKind::Copy, batch, ctx).await
    }

    async fn move_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        self.transfer_batch(OperationKind::Move, batch, ctx).await
    }

    async fn delete_items(
        &self,
        items: &[FsItem],
        permanently: bool,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        let total = items.len().max(1) as f32;

        for (index, item) in items.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                return Err(OpsError::Cancelled);
            }

            let path = item.path.clone();
            let result = if permanently {
                run_blocking(move || transfer::remove_path(&path)).await
            } else {
                run_blocking(move || {
                    trash::delete(&path).map_err(|e| io::Error::other(e.to_string()))
                })
                .await
            };

            if let Err(error) = result {
                warn!(path = %item.path.display(), %error, "delete failed in fallback engine");
                ctx.status.report(status_for_io(&error)).await;
                return Ok(None);
            }
            ctx.progress.report((index + 1) as f32 / total * 100.0).await;
        }

        debug!(count = items.len(), permanently, "fallback delete completed");
        ctx.status.report(StatusCode::Success).await;
        // Recycle locations are not observable through the trash crate, so
        // the record carries no redo side either way.
        Ok(Some(HistoryRecord::new(
            OperationKind::Delete,
            items.to_vec(),
            None,
        )))
    }

    async fn rename_item(
        &self,
        item: &FsItem,
        new_name: &str,
        policy: CollisionPolicy,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        validate_name(new_name)?;

        let parent = item.path.parent().map(PathBuf::from).unwrap_or_default();
        let mut target = parent.join(new_name);

        if target.exists() && !item.same_path(&target) {
            match policy {
                CollisionPolicy::GenerateNewName => target = generate_unique_name(&target),
                CollisionPolicy::ReplaceExisting => {
                    let path = target.clone();
                    run_blocking(move || transfer::remove_path(&path))
                        .await
                        .map_err(|e| OpsError::io(&target, e))?;
                }
                CollisionPolicy::Skip => {
                    ctx.status.report(StatusCode::AlreadyExists).await;
                    return Ok(None);
                }
            }
        }

        let src = item.path.clone();
        let dst = target.clone();
        if let Err(error) = run_blocking(move || std::fs::rename(&src, &dst)).await {
            warn!(path = %item.path.display(), %error, "rename failed in fallback engine");
            ctx.status.report(status_for_io(&error)).await;
            return Ok(None);
        }

        ctx.progress.report(100.0).await;
        ctx.status.report(StatusCode::Success).await;
        Ok(Some(HistoryRecord::new(
            OperationKind::Rename,
            vec![item.clone()],
            Some(vec![item.relocated(target)]),
        )))
    }

    async fn create_item(
        &self,
        item: &FsItem,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        validate_name(&item.name())?;

        if item.path.exists() {
            ctx.status.report(StatusCode::AlreadyExists).await;
            return Ok(None);
        }

        let path = item.path.clone();
        let is_dir = item.kind.is_container();
        let result = run_blocking(move || {
            if is_dir {
                std::fs::create_dir_all(&path)
            } else {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::File::create(&path).map(|_| ())
            }
        })
        .await;

        if let Err(error) = result {
            warn!(path = %item.path.display(), %error, "create failed in fallback engine");
            ctx.status.report(status_for_io(&error)).await;
            return Ok(None);
        }

        ctx.progress.report(100.0).await;
        ctx.status.report(StatusCode::Success).await;
        // Undo deletes the created item; there is no prior state to
        // restore, so the record carries no redo side.
        Ok(Some(HistoryRecord::new(
            OperationKind::Create,
            vec![item.clone()],
            None,
        )))
    }

    async fn restore_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        self.transfer_batch(OperationKind::Restore, batch, ctx).await
    }
}

async fn run_blocking<T, F>(f: F) -> io::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?
}

fn status_for_io(error: &io::Error) -> StatusCode {
    match error.kind() {
        io::ErrorKind::PermissionDenied => StatusCode::Unauthorized,
        io::ErrorKind::NotFound => StatusCode::NotFound,
        io::ErrorKind::AlreadyExists => StatusCode::AlreadyExists,
        _ => StatusCode::Generic,
    }
}
