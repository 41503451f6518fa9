//! Collision-policy partitioning.
//!
//! The worker takes one overwrite flag per request, so a mixed batch is
//! split into a rename group (dispatched without overwrite) and a replace
//! group (dispatched with it). Skipped triples are dropped up front.

use ferry_core::{CollisionPolicy, OperationBatch};

/// A batch split by collision policy, alignment preserved within each group.
#[derive(Debug, Clone)]
pub struct PartitionedBatch {
    /// Triples dispatched without the overwrite flag (`GenerateNewName`).
    pub rename: OperationBatch,
    /// Triples dispatched with the overwrite flag (`ReplaceExisting`).
    pub replace: OperationBatch,
    /// How many triples were dropped as `Skip`.
    pub skipped: usize,
}

impl PartitionedBatch {
    /// Whether nothing survived the skip filter.
    pub fn is_empty(&self) -> bool {
        self.rename.is_empty() && self.replace.is_empty()
    }

    /// Surviving triple count across both groups.
    pub fn len(&self) -> usize {
        self.rename.len() + self.replace.len()
    }
}

/// Split `batch` into overwrite groups, dropping `Skip` triples.
pub fn partition(batch: &OperationBatch) -> PartitionedBatch {
    let active = batch.without_skipped();
    let mut rename = (Vec::new(), Vec::new(), Vec::new());
    let mut replace = (Vec::new(), Vec::new(), Vec::new());

    for (source, destination, policy) in active.iter() {
        let group = match policy {
            CollisionPolicy::ReplaceExisting => &mut replace,
            CollisionPolicy::GenerateNewName => &mut rename,
            CollisionPolicy::Skip => continue,
        };
        group.0.push(source.clone());
        group.1.push(destination.clone());
        group.2.push(policy);
    }

    PartitionedBatch {
        // Groups are built from one aligned batch; lengths cannot diverge.
        rename: OperationBatch::new(rename.0, rename.1, rename.2)
            .unwrap_or_else(|_| OperationBatch::empty()),
        replace: OperationBatch::new(replace.0, replace.1, replace.2)
            .unwrap_or_else(|_| OperationBatch::empty()),
        skipped: batch.len() - active.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::FsItem;
    use std::path::PathBuf;

    #[test]
    fn test_partition_conserves_triples() {
        let batch = OperationBatch::new(
            vec![
                FsItem::file("/src/a"),
                FsItem::file("/src/b"),
                FsItem::file("/src/c"),
                FsItem::file("/src/d"),
            ],
            vec![
                PathBuf::from("/dst/a"),
                PathBuf::from("/dst/b"),
                PathBuf::from("/dst/c"),
                PathBuf::from("/dst/d"),
            ],
            vec![
                CollisionPolicy::Skip,
                CollisionPolicy::ReplaceExisting,
                CollisionPolicy::GenerateNewName,
                CollisionPolicy::ReplaceExisting,
            ],
        )
        .unwrap();

        let split = partition(&batch);
        assert_eq!(split.skipped, 1);
        assert_eq!(split.rename.len(), 1);
        assert_eq!(split.replace.len(), 2);
        assert_eq!(split.len() + split.skipped, batch.len());
        assert_eq!(split.rename.sources()[0].path, PathBuf::from("/src/c"));
        assert_eq!(split.replace.sources()[1].path, PathBuf::from("/src/d"));
    }

    #[test]
    fn test_all_skip_partitions_empty() {
        let batch = OperationBatch::single(
            FsItem::file("/src/a"),
            PathBuf::from("/dst/a"),
            CollisionPolicy::Skip,
        );
        let split = partition(&batch);
        assert!(split.is_empty());
        assert_eq!(split.skipped, 1);
    }
}
