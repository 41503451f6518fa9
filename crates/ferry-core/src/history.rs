//! Reversible history records consumed by an undo/redo manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::OperationKind;
use crate::item::FsItem;

/// A reversible description of a completed operation.
///
/// Created only after a batch fully succeeds; never mutated afterwards.
/// Ownership passes to the caller's undo stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The operation that was performed.
    pub kind: OperationKind,
    /// The items as they were before the operation (the undo side).
    pub undo: Vec<FsItem>,
    /// The items as they are after the operation (the redo side).
    ///
    /// `None` marks the operation as not undoable, e.g. an overwrite that
    /// destroyed the previous destination content.
    pub redo: Option<Vec<FsItem>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Create a record; when `redo` is present it must align with `undo`.
    pub fn new(kind: OperationKind, undo: Vec<FsItem>, redo: Option<Vec<FsItem>>) -> Self {
        debug_assert!(
            redo.as_ref().is_none_or(|r| r.len() == undo.len()),
            "undo and redo sides must be positionally aligned"
        );
        Self {
            kind,
            undo,
            redo,
            created_at: Utc::now(),
        }
    }

    /// A record for an operation that affected nothing (e.g. an all-skip
    /// batch).
    pub fn empty(kind: OperationKind) -> Self {
        Self::new(kind, Vec::new(), Some(Vec::new()))
    }

    /// Whether an undo manager can reverse this record.
    pub fn is_undoable(&self) -> bool {
        self.redo.is_some()
    }

    /// Iterate over aligned (before, after) pairs, empty when the record is
    /// not undoable.
    pub fn pairs(&self) -> impl Iterator<Item = (&FsItem, &FsItem)> {
        self.undo
            .iter()
            .zip(self.redo.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_record_is_not_undoable() {
        let record = HistoryRecord::new(OperationKind::Copy, vec![FsItem::file("/a")], None);
        assert!(!record.is_undoable());
        assert_eq!(record.pairs().count(), 0);
    }

    #[test]
    fn test_empty_record() {
        let record = HistoryRecord::empty(OperationKind::Move);
        assert!(record.is_undoable());
        assert!(record.undo.is_empty());
        assert_eq!(record.redo.as_deref(), Some(&[][..]));
    }
}
