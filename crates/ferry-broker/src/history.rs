//! Assembling history records from worker outcomes.

use std::path::{Path, PathBuf};

use ferry_core::{
    CollisionPolicy, FsItem, HistoryRecord, ItemKind, OperationBatch, OperationKind, paths_equal,
};

use crate::proto::ItemOutcome;

/// Whether an outcome contributes a reversible pair: it must have
/// succeeded, report a final destination, and that destination must differ
/// from the source. An overwrite reports destination == source equivalent
/// or none at all, and is excluded because the replaced content is gone.
fn is_reversible(outcome: &ItemOutcome) -> bool {
    match &outcome.destination {
        Some(destination) if outcome.succeeded => {
            !paths_equal(Path::new(&outcome.source), Path::new(destination))
        }
        _ => false,
    }
}

/// Build a transfer record (copy, move, restore, rename, create link) from
/// worker outcomes, matching each success back to its original triple.
///
/// Returns `None` when no reversible pair survives, e.g. an overwrite-only
/// replace group.
pub fn build_history(
    kind: OperationKind,
    items: &[ItemOutcome],
    batch: &OperationBatch,
) -> Option<HistoryRecord> {
    let mut undo = Vec::new();
    let mut redo = Vec::new();

    for outcome in items.iter().filter(|o| is_reversible(o)) {
        // Worker outcomes arrive in request order, but matching by source
        // path keeps the record correct even if a worker reorders them.
        if let Some((source, _, policy)) = batch.find_by_source(Path::new(&outcome.source)) {
            // Replace-group items destroyed their previous destination
            // content; they never contribute a reversible pair.
            if policy == CollisionPolicy::ReplaceExisting {
                continue;
            }
            let destination = outcome.destination.as_deref().unwrap_or_default();
            undo.push(source.clone());
            redo.push(source.relocated(PathBuf::from(destination)));
        }
    }

    if undo.is_empty() {
        return None;
    }
    Some(HistoryRecord::new(kind, undo, Some(redo)))
}

/// Build a delete record. Recycled items report their recycle-store
/// location as the outcome destination; the subset that did becomes the
/// restorable record, aligned undo/redo. A permanent delete (or a worker
/// that reported no locations at all) yields a record with no redo side.
pub fn build_delete_history(
    items: &[FsItem],
    outcomes: &[ItemOutcome],
    permanently: bool,
) -> HistoryRecord {
    if !permanently {
        let mut undo = Vec::new();
        let mut redo = Vec::new();
        for item in items {
            let recycled = outcomes
                .iter()
                .find(|o| o.succeeded && item.same_path(Path::new(&o.source)))
                .and_then(|o| o.destination.as_deref());
            if let Some(destination) = recycled {
                undo.push(item.clone());
                redo.push(FsItem::new(PathBuf::from(destination), ItemKind::Trash));
            }
        }
        if !undo.is_empty() {
            return HistoryRecord::new(OperationKind::Delete, undo, Some(redo));
        }
    }

    HistoryRecord::new(OperationKind::Delete, items.to_vec(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::CollisionPolicy;

    fn batch() -> OperationBatch {
        OperationBatch::new(
            vec![FsItem::file("/src/a.txt"), FsItem::file("/src/b.txt")],
            vec![PathBuf::from("/dst/a.txt"), PathBuf::from("/dst/b.txt")],
            vec![
                CollisionPolicy::GenerateNewName,
                CollisionPolicy::GenerateNewName,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_record_matches_outcomes_to_sources() {
        let items = vec![
            // Worker renamed the colliding destination.
            ItemOutcome::ok("/SRC/A.TXT", Some("/dst/a (1).txt".into())),
            ItemOutcome::failed("/src/b.txt", 5),
        ];
        let record = build_history(OperationKind::Copy, &items, &batch()).unwrap();
        assert_eq!(record.undo.len(), 1);
        assert_eq!(record.undo[0].path, PathBuf::from("/src/a.txt"));
        assert_eq!(
            record.redo.as_ref().unwrap()[0].path,
            PathBuf::from("/dst/a (1).txt")
        );
    }

    #[test]
    fn test_overwrite_only_success_yields_no_record() {
        // Destination equal to source (case-insensitive) marks an in-place
        // outcome; a missing destination marks an overwrite.
        let items = vec![
            ItemOutcome::ok("/src/a.txt", None),
            ItemOutcome::ok("/src/b.txt", Some("/SRC/B.TXT".into())),
        ];
        assert!(build_history(OperationKind::Move, &items, &batch()).is_none());
    }

    #[test]
    fn test_replace_group_items_are_excluded() {
        let batch = OperationBatch::new(
            vec![FsItem::file("/src/a.txt"), FsItem::file("/src/b.txt")],
            vec![PathBuf::from("/dst/a.txt"), PathBuf::from("/dst/b.txt")],
            vec![
                CollisionPolicy::ReplaceExisting,
                CollisionPolicy::GenerateNewName,
            ],
        )
        .unwrap();
        let items = vec![
            ItemOutcome::ok("/src/a.txt", Some("/dst/a.txt".into())),
            ItemOutcome::ok("/src/b.txt", Some("/dst/b.txt".into())),
        ];
        let record = build_history(OperationKind::Move, &items, &batch).unwrap();
        assert_eq!(record.undo.len(), 1);
        assert_eq!(record.undo[0].path, PathBuf::from("/src/b.txt"));
    }

    #[test]
    fn test_recycle_delete_is_undoable() {
        let items = vec![FsItem::file("/docs/a.txt")];
        let outcomes = vec![ItemOutcome::ok("/docs/a.txt", Some("/trash/$R123.txt".into()))];
        let record = build_delete_history(&items, &outcomes, false);
        assert!(record.is_undoable());
        assert_eq!(
            record.redo.as_ref().unwrap()[0].path,
            PathBuf::from("/trash/$R123.txt")
        );
        assert_eq!(record.redo.as_ref().unwrap()[0].kind, ItemKind::Trash);
    }

    #[test]
    fn test_recycle_delete_keeps_restorable_subset() {
        let items = vec![FsItem::file("/docs/a.txt"), FsItem::file("/docs/b.txt")];
        // Only the first item reported a recycle location.
        let outcomes = vec![
            ItemOutcome::ok("/docs/a.txt", Some("/trash/$RA.txt".into())),
            ItemOutcome::ok("/docs/b.txt", None),
        ];
        let record = build_delete_history(&items, &outcomes, false);
        assert!(record.is_undoable());
        assert_eq!(record.undo.len(), 1);
        assert_eq!(record.undo[0].path, PathBuf::from("/docs/a.txt"));
        assert_eq!(
            record.redo.as_ref().unwrap()[0].path,
            PathBuf::from("/trash/$RA.txt")
        );
    }

    #[test]
    fn test_permanent_delete_is_not_undoable() {
        let items = vec![FsItem::file("/docs/a.txt")];
        let outcomes = vec![ItemOutcome::ok("/docs/a.txt", Some("/trash/$R123.txt".into()))];
        let record = build_delete_history(&items, &outcomes, true);
        assert!(!record.is_undoable());
        assert_eq!(record.undo, items);
    }
}
