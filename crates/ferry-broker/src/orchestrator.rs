//! The orchestration core: dispatch, triage, recover, record.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ferry_core::{
    CollisionPolicy, ElevationService, FallbackEngine, FsItem, HistoryRecord, OperationBatch,
    OperationContext, OperationKind, OpsError, ResolutionService, StatusCode, TrashStore, Verdict,
    sidecar_path,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::channel::{BrokerChannel, FRAME_CHANNEL_SIZE};
use crate::classify::{all_metadata_failures, destination_sharing_violation, first_failure_status};
use crate::history::{build_delete_history, build_history};
use crate::partition::{PartitionedBatch, partition};
use crate::proto::{ItemOutcome, WorkerAction, WorkerRequest};
use crate::recovery::{FailureReason, RetryBudget};

/// Drives batch operations through the privileged worker, recovering from
/// classified failures and handing work to the fallback engine when the
/// worker cannot take it.
///
/// Each top-level call generates one operation id that survives every
/// replay, subset retry, and fallback handoff, and reports exactly one
/// status code.
pub struct ShellOrchestrator {
    channel: Option<Arc<BrokerChannel>>,
    fallback: Arc<dyn FallbackEngine>,
    elevation: Arc<dyn ElevationService>,
    resolution: Arc<dyn ResolutionService>,
    trash: Arc<dyn TrashStore>,
}

impl ShellOrchestrator {
    pub fn new(
        channel: Option<Arc<BrokerChannel>>,
        fallback: Arc<dyn FallbackEngine>,
        elevation: Arc<dyn ElevationService>,
        resolution: Arc<dyn ResolutionService>,
        trash: Arc<dyn TrashStore>,
    ) -> Self {
        Self {
            channel,
            fallback,
            elevation,
            resolution,
            trash,
        }
    }

    /// Copy a batch of items.
    pub async fn copy_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        self.transfer(OperationKind::Copy, batch, ctx).await
    }

    /// Move a batch of items. A destination inside its own source subtree
    /// aborts before anything is dispatched.
    pub async fn move_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        for (source, destination, _) in batch.iter() {
            if source.kind.is_container() && destination_inside_source(&source.path, destination) {
                let dest_name = destination
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.resolution
                    .notify_structural_conflict(&source.name(), &dest_name)
                    .await;
                ctx.status.report(StatusCode::InvalidArgument).await;
                return Ok(None);
            }
        }
        self.transfer(OperationKind::Move, batch, ctx).await
    }

    /// Delete items, to the recycle store unless `permanently`. Items that
    /// already live under the trash root are always removed permanently,
    /// together with their sidecar metadata entries.
    pub async fn delete_items(
        &self,
        items: &[FsItem],
        permanently: bool,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        if ctx.cancel.is_cancelled() {
            return Err(OpsError::Cancelled);
        }

        let items = dedupe(items);
        if items.is_empty() {
            ctx.status.report(StatusCode::Success).await;
            return Ok(Some(HistoryRecord::empty(OperationKind::Delete)));
        }

        let mut permanently = permanently;
        let mut wire = Vec::with_capacity(items.len());
        let mut sidecars = Vec::new();
        for item in &items {
            wire.push(item.path.to_string_lossy().into_owned());
            if self.trash.is_under_trash(&item.path) {
                // Deleting out of the trash store is always permanent, and
                // takes the paired metadata entry along.
                permanently = true;
                let sidecar = sidecar_path(&item.path);
                if !item.same_path(&sidecar) {
                    sidecars.push(sidecar.to_string_lossy().into_owned());
                }
            }
        }
        wire.extend(sidecars);

        let addressable = items.iter().all(FsItem::is_broker_addressable);
        let Some(channel) = self.live_channel().filter(|_| addressable) else {
            return self.fallback.delete_items(&items, permanently, ctx).await;
        };

        let op_id = Uuid::new_v4();
        let mut budget = RetryBudget::new();
        let mut completed: Vec<ItemOutcome> = Vec::new();
        let mut pending = self
            .dispatch_round(channel, WorkerRequest::deletion(op_id, wire.clone(), permanently), ctx)
            .await?
            .items;

        loop {
            // A permanent delete coming back uniformly -1 could not drop
            // secondary metadata streams; re-run it locally.
            if permanently && all_metadata_failures(&pending) {
                let failed_items = select_items(&items, &pending);
                return self.fallback.delete_items(&failed_items, permanently, ctx).await;
            }

            let (succeeded, failed): (Vec<_>, Vec<_>) =
                pending.into_iter().partition(|o| o.succeeded);
            completed.extend(succeeded);

            if failed.is_empty() {
                info!(%op_id, count = items.len(), permanently, "delete completed");
                ctx.status.report(StatusCode::Success).await;
                return Ok(Some(build_delete_history(&items, &completed, permanently)));
            }

            match crate::recovery::dominant_failure(&failed) {
                Some(FailureReason::Unauthorized) => {
                    if budget.try_spend(FailureReason::Unauthorized)
                        && self.elevation.request_elevation().await
                    {
                        completed.clear();
                        let request = WorkerRequest::deletion(op_id, wire.clone(), permanently);
                        pending = self.dispatch_round(channel, request, ctx).await?.items;
                        continue;
                    }
                    ctx.status.report(StatusCode::Unauthorized).await;
                    return Ok(None);
                }
                Some(FailureReason::InUse) => {
                    if let Some(retry) = self.prompt_in_use(&mut budget, &failed, None).await {
                        pending = self
                            .dispatch_round(
                                channel,
                                WorkerRequest::deletion(op_id, retry, permanently),
                                ctx,
                            )
                            .await?
                            .items;
                        continue;
                    }
                    ctx.status.report(StatusCode::InUse).await;
                    return Ok(None);
                }
                Some(FailureReason::NameTooLong) => {
                    // The recycle store rejects overlong paths outright;
                    // there is no local route that preserves restorability.
                    warn!(%op_id, "delete aborted, path exceeds worker length limit");
                    ctx.status.report(StatusCode::NameTooLong).await;
                    return Ok(None);
                }
                Some(FailureReason::NotFound) => {
                    self.resolution.notify_not_found().await;
                    ctx.status.report(StatusCode::NotFound).await;
                    return Ok(None);
                }
                _ => {
                    ctx.status.report(first_failure_status(&failed)).await;
                    return Ok(None);
                }
            }
        }
    }

    /// Rename one item within its parent directory.
    pub async fn rename_item(
        &self,
        item: &FsItem,
        new_name: &str,
        policy: CollisionPolicy,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        if ctx.cancel.is_cancelled() {
            return Err(OpsError::Cancelled);
        }

        let destination = item
            .path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(new_name);
        let batch = OperationBatch::single(item.clone(), destination.clone(), policy);

        let Some(channel) = self.live_channel().filter(|_| batch.is_broker_addressable()) else {
            return self.fallback.rename_item(item, new_name, policy, ctx).await;
        };

        let op_id = Uuid::new_v4();
        let mut budget = RetryBudget::new();
        let request = WorkerRequest::transfer(
            op_id,
            WorkerAction::Rename,
            vec![item.path.to_string_lossy().into_owned()],
            vec![destination.to_string_lossy().into_owned()],
            policy == CollisionPolicy::ReplaceExisting,
        );

        let mut items = self.dispatch_round(channel, request.clone(), ctx).await?.items;
        loop {
            if items.iter().all(|o| o.succeeded) {
                ctx.status.report(StatusCode::Success).await;
                return Ok(build_history(OperationKind::Rename, &items, &batch));
            }

            if all_metadata_failures(&items) {
                return self.fallback.rename_item(item, new_name, policy, ctx).await;
            }

            match crate::recovery::dominant_failure(&items) {
                Some(FailureReason::Unauthorized) => {
                    if budget.try_spend(FailureReason::Unauthorized)
                        && self.elevation.request_elevation().await
                    {
                        items = self.dispatch_round(channel, request.clone(), ctx).await?.items;
                        continue;
                    }
                    ctx.status.report(StatusCode::Unauthorized).await;
                    return Ok(None);
                }
                Some(FailureReason::InUse) => {
                    let failed: Vec<_> = items.iter().filter(|o| !o.succeeded).cloned().collect();
                    if self
                        .prompt_in_use(&mut budget, &failed, Some(&batch))
                        .await
                        .is_some()
                    {
                        items = self.dispatch_round(channel, request.clone(), ctx).await?.items;
                        continue;
                    }
                    ctx.status.report(StatusCode::InUse).await;
                    return Ok(None);
                }
                Some(FailureReason::NameTooLong) => {
                    return self.fallback.rename_item(item, new_name, policy, ctx).await;
                }
                Some(FailureReason::NotFound) => {
                    self.resolution.notify_not_found().await;
                    ctx.status.report(StatusCode::NotFound).await;
                    return Ok(None);
                }
                Some(FailureReason::AlreadyExists) => {
                    self.resolution.notify_already_exists().await;
                    ctx.status.report(StatusCode::AlreadyExists).await;
                    return Ok(None);
                }
                None => {
                    ctx.status.report(first_failure_status(&items)).await;
                    return Ok(None);
                }
            }
        }
    }

    /// Create an empty file or directory.
    pub async fn create_item(
        &self,
        item: &FsItem,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        if ctx.cancel.is_cancelled() {
            return Err(OpsError::Cancelled);
        }

        let Some(channel) = self.live_channel().filter(|_| item.is_broker_addressable()) else {
            return self.fallback.create_item(item, ctx).await;
        };

        let action = if item.kind.is_container() {
            WorkerAction::CreateFolder
        } else {
            WorkerAction::CreateFile
        };
        let op_id = Uuid::new_v4();
        let request = WorkerRequest {
            op_id,
            action,
            sources: Vec::new(),
            destinations: vec![item.path.to_string_lossy().into_owned()],
            overwrite: false,
            permanently: false,
        };

        let mut elevated = false;
        loop {
            let reply = self.dispatch_round(channel, request.clone(), ctx).await?;
            if reply.success {
                ctx.status.report(StatusCode::Success).await;
                // Undo deletes the created item; there is no prior state to
                // restore, so the record carries no redo side.
                return Ok(Some(HistoryRecord::new(
                    OperationKind::Create,
                    vec![item.clone()],
                    None,
                )));
            }

            match crate::recovery::dominant_failure(&reply.items) {
                Some(FailureReason::Unauthorized) if !elevated => {
                    if self.elevation.request_elevation().await {
                        elevated = true;
                        continue;
                    }
                    ctx.status.report(StatusCode::Unauthorized).await;
                    return Ok(None);
                }
                Some(FailureReason::AlreadyExists) => {
                    self.resolution.notify_already_exists().await;
                    ctx.status.report(StatusCode::AlreadyExists).await;
                    return Ok(None);
                }
                _ => {
                    ctx.status.report(first_failure_status(&reply.items)).await;
                    return Ok(None);
                }
            }
        }
    }

    /// Create a link for every (target, link path) pair in the batch.
    ///
    /// Pairs are dispatched one at a time; a record of the pairs that
    /// succeeded is always returned, with `Generic` status when any pair
    /// fell through.
    pub async fn create_link_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        let mut undo = Vec::new();
        let mut redo = Vec::new();

        let Some(channel) = self.live_channel().filter(|_| batch.is_broker_addressable()) else {
            ctx.status.report(StatusCode::Generic).await;
            return Ok(Some(HistoryRecord::new(OperationKind::CreateLink, undo, Some(redo))));
        };

        let op_id = Uuid::new_v4();
        let total = batch.len().max(1) as f32;
        let mut all_ok = true;

        for (index, (source, destination, _)) in batch.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                all_ok = false;
                break;
            }

            let request = WorkerRequest::transfer(
                op_id,
                WorkerAction::CreateLink,
                vec![source.path.to_string_lossy().into_owned()],
                vec![destination.to_string_lossy().into_owned()],
                false,
            );
            match self.dispatch_round(channel, request, ctx).await {
                Ok(reply) if reply.success => {
                    undo.push(source.clone());
                    redo.push(source.relocated(destination.clone()));
                }
                Ok(_) => all_ok = false,
                Err(error) => {
                    warn!(%op_id, %error, "link creation stopped early");
                    all_ok = false;
                    break;
                }
            }
            ctx.progress.report((index + 1) as f32 / total * 100.0).await;
        }

        ctx.status
            .report(if all_ok {
                StatusCode::Success
            } else {
                StatusCode::Generic
            })
            .await;
        Ok(Some(HistoryRecord::new(
            OperationKind::CreateLink,
            undo,
            Some(redo),
        )))
    }

    /// Move recycled items back out of the trash store. After the primary
    /// move, the paired sidecar entries are deleted permanently; that
    /// cleanup's outcome never affects the returned record.
    pub async fn restore_items(
        &self,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        let record = self.transfer(OperationKind::Restore, batch, ctx).await?;

        if let Some(record) = &record {
            let sidecars: Vec<FsItem> = record
                .undo
                .iter()
                .map(|item| item.relocated(sidecar_path(&item.path)))
                // Entries without a data prefix have no paired sidecar.
                .filter(|sidecar| !record.undo.iter().any(|i| i.same_path(&sidecar.path)))
                .collect();
            if !sidecars.is_empty() {
                let detached = OperationContext::detached(ctx.cancel.clone());
                if let Err(error) = self.delete_items(&sidecars, true, &detached).await {
                    debug!(%error, "sidecar cleanup after restore failed");
                }
            }
        }

        Ok(record)
    }

    /// Shared core for copy, move, and restore.
    async fn transfer(
        &self,
        kind: OperationKind,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        if ctx.cancel.is_cancelled() {
            return Err(OpsError::Cancelled);
        }

        if batch.is_empty() || batch.all_skip() {
            // Nothing survives the skip filter: no dispatch, no fallback.
            ctx.status.report(StatusCode::Success).await;
            return Ok(Some(HistoryRecord::empty(kind)));
        }

        let Some(channel) = self.live_channel().filter(|_| batch.is_broker_addressable()) else {
            debug!(%kind, "batch routed to fallback engine");
            return self.fallback_transfer(kind, batch, ctx).await;
        };

        let active = batch.without_skipped();
        let split = partition(batch);
        let action = match kind {
            OperationKind::Copy => WorkerAction::Copy,
            // Restores are moves out of the trash store.
            _ => WorkerAction::Move,
        };

        let op_id = Uuid::new_v4();
        let mut budget = RetryBudget::new();
        let mut completed: Vec<ItemOutcome> = Vec::new();
        let mut recovered: Vec<(FsItem, FsItem)> = Vec::new();
        let mut pending = self.dispatch_groups(channel, action, &split, op_id, ctx).await?;

        loop {
            // Uniformly -1 round: the data moved but secondary metadata
            // streams did not; only a local re-run can carry those. Checked
            // over the whole round before the taxonomy sees it.
            if all_metadata_failures(&pending) {
                let subset = select_failed(&active, &pending);
                let record = self.fallback_transfer(kind, &subset, ctx).await?;
                fold(&mut recovered, record);
                return Ok(assemble(kind, &completed, &recovered, &active));
            }

            let (succeeded, failed): (Vec<_>, Vec<_>) =
                pending.into_iter().partition(|o| o.succeeded);
            completed.extend(succeeded);

            if failed.is_empty() {
                info!(%op_id, %kind, count = active.len(), "operation completed");
                ctx.status.report(StatusCode::Success).await;
                return Ok(assemble(kind, &completed, &recovered, &active));
            }

            match crate::recovery::dominant_failure(&failed) {
                Some(FailureReason::Unauthorized) => {
                    if budget.try_spend(FailureReason::Unauthorized)
                        && self.elevation.request_elevation().await
                    {
                        debug!(%op_id, "elevated, replaying full batch");
                        completed.clear();
                        recovered.clear();
                        pending = self.dispatch_groups(channel, action, &split, op_id, ctx).await?;
                        continue;
                    }
                    ctx.status.report(StatusCode::Unauthorized).await;
                    return Ok(None);
                }
                Some(FailureReason::InUse) => {
                    if self
                        .prompt_in_use(&mut budget, &failed, Some(&active))
                        .await
                        .is_some()
                    {
                        let subset = select_failed(&active, &failed);
                        pending = self
                            .dispatch_groups(channel, action, &partition(&subset), op_id, ctx)
                            .await?;
                        continue;
                    }
                    // Declined or out of budget; whatever already succeeded
                    // still folds into the record.
                    ctx.status.report(StatusCode::InUse).await;
                    return Ok(assemble(kind, &completed, &recovered, &active));
                }
                Some(FailureReason::NameTooLong) => {
                    let subset = select_failed(&active, &failed);
                    let record = self.fallback_transfer(kind, &subset, ctx).await?;
                    fold(&mut recovered, record);
                    return Ok(assemble(kind, &completed, &recovered, &active));
                }
                Some(FailureReason::NotFound) => {
                    self.resolution.notify_not_found().await;
                    ctx.status.report(StatusCode::NotFound).await;
                    return Ok(assemble(kind, &completed, &recovered, &active));
                }
                Some(FailureReason::AlreadyExists) => {
                    self.resolution.notify_already_exists().await;
                    ctx.status.report(StatusCode::AlreadyExists).await;
                    return Ok(assemble(kind, &completed, &recovered, &active));
                }
                None => {
                    ctx.status.report(first_failure_status(&failed)).await;
                    return Ok(assemble(kind, &completed, &recovered, &active));
                }
            }
        }
    }

    async fn fallback_transfer(
        &self,
        kind: OperationKind,
        batch: &OperationBatch,
        ctx: &OperationContext,
    ) -> Result<Option<HistoryRecord>, OpsError> {
        match kind {
            OperationKind::Copy => self.fallback.copy_items(batch, ctx).await,
            OperationKind::Move => self.fallback.move_items(batch, ctx).await,
            OperationKind::Restore => self.fallback.restore_items(batch, ctx).await,
            _ => unreachable!("transfer core only handles copy, move, and restore"),
        }
    }

    /// Dispatch the rename group (no overwrite) and the replace group
    /// (overwrite) sequentially under one operation id.
    async fn dispatch_groups(
        &self,
        channel: &Arc<BrokerChannel>,
        action: WorkerAction,
        split: &PartitionedBatch,
        op_id: Uuid,
        ctx: &OperationContext,
    ) -> Result<Vec<ItemOutcome>, OpsError> {
        let mut outcomes = Vec::with_capacity(split.len());
        for (group, overwrite) in [(&split.rename, false), (&split.replace, true)] {
            if group.is_empty() {
                continue;
            }
            let request = WorkerRequest::transfer(
                op_id,
                action,
                group
                    .sources()
                    .iter()
                    .map(|s| s.path.to_string_lossy().into_owned())
                    .collect(),
                group
                    .destinations()
                    .iter()
                    .map(|d| d.to_string_lossy().into_owned())
                    .collect(),
                overwrite,
            );
            outcomes.extend(self.dispatch_round(channel, request, ctx).await?.items);
        }
        Ok(outcomes)
    }

    /// One request round-trip with progress forwarding and a cancellation
    /// watcher. The watcher relays the caller's cancellation to the worker
    /// and stands down when the round ends, on every exit path.
    async fn dispatch_round(
        &self,
        channel: &Arc<BrokerChannel>,
        request: WorkerRequest,
        ctx: &OperationContext,
    ) -> Result<crate::proto::WorkerReply, OpsError> {
        let op_id = request.op_id;

        let (progress_tx, mut progress_rx) = mpsc::channel(FRAME_CHANNEL_SIZE);
        let _progress_guard = channel.register_progress(op_id, progress_tx);
        let sink = ctx.progress.clone();
        tokio::spawn(async move {
            while let Some(percent) = progress_rx.recv().await {
                sink.report(percent).await;
            }
        });

        let done = CancellationToken::new();
        let _done_guard = done.clone().drop_guard();
        let cancel = ctx.cancel.clone();
        let watcher_channel = Arc::clone(channel);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => watcher_channel.cancel(op_id),
                _ = done.cancelled() => {}
            }
        });

        channel.dispatch(request).await
    }

    async fn prompt_in_use(
        &self,
        budget: &mut RetryBudget,
        failed: &[ItemOutcome],
        batch: Option<&OperationBatch>,
    ) -> Option<Vec<String>> {
        if !budget.try_spend(FailureReason::InUse) {
            return None;
        }
        let paths: Vec<PathBuf> = failed.iter().map(|o| prompt_path(o, batch)).collect();
        let locking = self.trash.locking_processes(&paths).await;
        match self.resolution.prompt_file_in_use(&paths, &locking).await {
            Verdict::Retry => Some(failed.iter().map(|o| o.source.clone()).collect()),
            Verdict::Cancel => None,
        }
    }

    fn live_channel(&self) -> Option<&Arc<BrokerChannel>> {
        self.channel.as_ref().filter(|c| !c.is_closed())
    }
}

/// The sub-batch whose triples match the failed outcomes.
fn select_failed(active: &OperationBatch, failed: &[ItemOutcome]) -> OperationBatch {
    let paths: Vec<PathBuf> = failed.iter().map(|o| PathBuf::from(&o.source)).collect();
    let refs: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    active.select_by_sources(&refs)
}

/// The items whose paths match the failed outcomes.
fn select_items(items: &[FsItem], failed: &[ItemOutcome]) -> Vec<FsItem> {
    items
        .iter()
        .filter(|item| failed.iter().any(|o| item.same_path(Path::new(&o.source))))
        .cloned()
        .collect()
}

/// The path an in-use prompt should show for a failed outcome. A
/// destination-side sharing violation points at the destination; the
/// worker's reported path wins, then the requested one.
fn prompt_path(outcome: &ItemOutcome, batch: Option<&OperationBatch>) -> PathBuf {
    if destination_sharing_violation(outcome.native_code) {
        if let Some(destination) = &outcome.destination {
            return PathBuf::from(destination);
        }
        if let Some((_, destination, _)) =
            batch.and_then(|b| b.find_by_source(Path::new(&outcome.source)))
        {
            return destination.clone();
        }
    }
    PathBuf::from(&outcome.source)
}

/// Accumulate the reversible pairs a fallback handoff produced.
fn fold(recovered: &mut Vec<(FsItem, FsItem)>, record: Option<HistoryRecord>) {
    if let Some(record) = record {
        recovered.extend(record.pairs().map(|(u, r)| (u.clone(), r.clone())));
    }
}

/// Build the final record from broker successes plus recovered pairs.
/// `None` when nothing reversible survives, e.g. an overwrite-only batch.
fn assemble(
    kind: OperationKind,
    completed: &[ItemOutcome],
    recovered: &[(FsItem, FsItem)],
    active: &OperationBatch,
) -> Option<HistoryRecord> {
    let (mut undo, mut redo) = match build_history(kind, completed, active) {
        Some(record) => {
            let redo = record.redo.clone().unwrap_or_default();
            (record.undo, redo)
        }
        None => (Vec::new(), Vec::new()),
    };
    for (before, after) in recovered {
        undo.push(before.clone());
        redo.push(after.clone());
    }

    if undo.is_empty() {
        return None;
    }
    Some(HistoryRecord::new(kind, undo, Some(redo)))
}

/// Whether `destination` sits inside the subtree rooted at `source`
/// (case-insensitive).
fn destination_inside_source(source: &Path, destination: &Path) -> bool {
    let src = source.to_string_lossy().to_lowercase();
    let dst = destination.to_string_lossy().to_lowercase();
    match dst.strip_prefix(&src) {
        Some(rest) => rest.starts_with(['/', '\\']),
        None => false,
    }
}

/// Drop duplicate paths (case-insensitive), keeping first occurrences.
fn dedupe(items: &[FsItem]) -> Vec<FsItem> {
    let mut seen: Vec<&FsItem> = Vec::new();
    let mut unique = Vec::new();
    for item in items {
        if !seen.iter().any(|s| s.same_path(&item.path)) {
            seen.push(item);
            unique.push(item.clone());
        }
    }
    unique
}
