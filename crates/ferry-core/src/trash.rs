//! Trash store conventions and introspection types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File-name prefix of a recycled item's data file.
pub const RECYCLE_DATA_PREFIX: &str = "$R";

/// File-name prefix of the sidecar metadata entry paired with a recycled
/// item.
pub const RECYCLE_META_PREFIX: &str = "$I";

/// The sidecar metadata path paired with a recycled item.
///
/// The trash store keeps a `$I`-prefixed entry next to every `$R`-prefixed
/// item, sharing the rest of the name.
pub fn sidecar_path(recycled: &Path) -> PathBuf {
    let parent = recycled.parent().unwrap_or(Path::new(""));
    let name = recycled
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    parent.join(name.replacen(RECYCLE_DATA_PREFIX, RECYCLE_META_PREFIX, 1))
}

/// One recycled item as the trash store reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrashEntry {
    /// Where the item lives inside the trash store.
    pub recycle_path: PathBuf,
    /// The item's name before it was recycled.
    pub original_name: String,
}

/// A process holding a lock on a path, for in-use prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingProcess {
    /// Process id.
    pub pid: u32,
    /// Process or application name.
    pub name: String,
}

impl std::fmt::Display for LockingProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (PID: {})", self.name, self.pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path_swaps_prefix() {
        let recycled = Path::new("/trash/files/$R1X2Y3Z.txt");
        assert_eq!(
            sidecar_path(recycled),
            PathBuf::from("/trash/files/$I1X2Y3Z.txt")
        );
    }

    #[test]
    fn test_sidecar_path_only_touches_first_prefix() {
        let recycled = Path::new("/trash/$Rdir/$Rinner.txt");
        assert_eq!(
            sidecar_path(recycled),
            PathBuf::from("/trash/$Rdir/$Iinner.txt")
        );
    }
}
