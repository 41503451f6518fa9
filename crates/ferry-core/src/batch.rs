//! Operation kinds, collision policies, and positionally-aligned batches.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::OpsError;
use crate::item::{FsItem, path_is_broker_addressable, paths_equal};

/// The operation a batch performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Copy,
    Move,
    Delete,
    Rename,
    Create,
    Restore,
    CreateLink,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "Copy"),
            Self::Move => write!(f, "Move"),
            Self::Delete => write!(f, "Delete"),
            Self::Rename => write!(f, "Rename"),
            Self::Create => write!(f, "Create"),
            Self::Restore => write!(f, "Restore"),
            Self::CreateLink => write!(f, "Create link"),
        }
    }
}

/// Per-item rule for handling a destination that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionPolicy {
    /// Leave the item out of the operation.
    #[default]
    Skip,
    /// Replace the existing destination.
    ReplaceExisting,
    /// Give the new item an unused name (e.g. "file (1).txt").
    GenerateNewName,
}

/// A set of positionally-aligned (source, destination, policy) triples
/// processed as one logical operation.
///
/// The three arrays are always equal length; [`OperationBatch::new`] rejects
/// anything else, so every accessor can index freely.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationBatch {
    sources: Vec<FsItem>,
    destinations: Vec<PathBuf>,
    policies: Vec<CollisionPolicy>,
}

impl OperationBatch {
    /// Create a batch from aligned arrays.
    pub fn new(
        sources: Vec<FsItem>,
        destinations: Vec<PathBuf>,
        policies: Vec<CollisionPolicy>,
    ) -> Result<Self, OpsError> {
        if sources.len() != destinations.len() || sources.len() != policies.len() {
            return Err(OpsError::MisalignedBatch {
                sources: sources.len(),
                destinations: destinations.len(),
                policies: policies.len(),
            });
        }
        Ok(Self {
            sources,
            destinations,
            policies,
        })
    }

    /// A batch of a single triple.
    pub fn single(source: FsItem, destination: PathBuf, policy: CollisionPolicy) -> Self {
        Self {
            sources: vec![source],
            destinations: vec![destination],
            policies: vec![policy],
        }
    }

    /// An empty batch.
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            destinations: Vec::new(),
            policies: Vec::new(),
        }
    }

    /// Number of triples in the batch.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the batch holds no triples.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// The source items.
    pub fn sources(&self) -> &[FsItem] {
        &self.sources
    }

    /// The destination paths.
    pub fn destinations(&self) -> &[PathBuf] {
        &self.destinations
    }

    /// The collision policies.
    pub fn policies(&self) -> &[CollisionPolicy] {
        &self.policies
    }

    /// Iterate over aligned triples.
    pub fn iter(&self) -> impl Iterator<Item = (&FsItem, &PathBuf, CollisionPolicy)> {
        self.sources
            .iter()
            .zip(&self.destinations)
            .zip(&self.policies)
            .map(|((s, d), p)| (s, d, *p))
    }

    /// Whether every triple carries [`CollisionPolicy::Skip`].
    pub fn all_skip(&self) -> bool {
        self.policies.iter().all(|p| *p == CollisionPolicy::Skip)
    }

    /// The batch with all `Skip` triples dropped, remaining triples
    /// positionally realigned.
    pub fn without_skipped(&self) -> Self {
        self.filtered(|(_, _, policy)| policy != CollisionPolicy::Skip)
    }

    /// The sub-batch whose source paths appear in `sources`
    /// (case-insensitive), remapped back to the original triples.
    pub fn select_by_sources(&self, sources: &[&Path]) -> Self {
        self.filtered(|(item, _, _)| sources.iter().any(|p| item.same_path(p)))
    }

    /// Look up the triple whose source matches `path` (case-insensitive).
    pub fn find_by_source(&self, path: &Path) -> Option<(&FsItem, &PathBuf, CollisionPolicy)> {
        self.iter().find(|(item, _, _)| item.same_path(path))
    }

    /// Whether the privileged worker can address every path in the batch.
    pub fn is_broker_addressable(&self) -> bool {
        self.sources.iter().all(FsItem::is_broker_addressable)
            && self.destinations.iter().all(|d| path_is_broker_addressable(d))
    }

    fn filtered<F>(&self, mut keep: F) -> Self
    where
        F: FnMut((&FsItem, &PathBuf, CollisionPolicy)) -> bool,
    {
        let mut sources = Vec::new();
        let mut destinations = Vec::new();
        let mut policies = Vec::new();
        for (source, destination, policy) in self.iter() {
            if keep((source, destination, policy)) {
                sources.push(source.clone());
                destinations.push(destination.clone());
                policies.push(policy);
            }
        }
        Self {
            sources,
            destinations,
            policies,
        }
    }
}

/// Generate an unused destination path for [`CollisionPolicy::GenerateNewName`].
///
/// For "file.txt", tries "file (1).txt", "file (2).txt", and so on, falling
/// back to a timestamp suffix.
pub fn generate_unique_name(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let extension = path.extension().and_then(|e| e.to_str());

    for i in 1..1000 {
        let candidate = match extension {
            Some(ext) => format!("{} ({}).{}", stem, i, ext),
            None => format!("{} ({})", stem, i),
        };
        let candidate = parent.join(candidate);
        if !candidate.exists() && !paths_equal(&candidate, path) {
            return candidate;
        }
    }

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let fallback = match extension {
        Some(ext) => format!("{}_{}.{}", stem, timestamp, ext),
        None => format!("{}_{}", stem, timestamp),
    };
    parent.join(fallback)
}
